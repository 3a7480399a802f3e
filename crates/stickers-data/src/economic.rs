//! Per-country, per-year economic indicator table.

use crate::error::{DataError, Result};
use crate::roster::Roster;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Source of a scalar economic indicator keyed by (country, year).
///
/// Lookups outside the source's domain return `None`; they never fail.
pub trait IndicatorSource {
    /// Indicator for a country in a year, if known.
    fn indicator(&self, country: &str, year: i32) -> Option<f64>;
}

/// Economic indicator (e.g. GDP per capita) by country and year.
///
/// Built once and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EconomicTable {
    values: HashMap<String, HashMap<i32, f64>>,
}

impl EconomicTable {
    /// Build a table from a countries x years matrix.
    ///
    /// `cells[i][j]` is the indicator for `countries[i]` in `years[j]`;
    /// `None` cells leave that pair out of the table. A shape mismatch, a
    /// repeated country or year label, or a negative/non-finite cell is a
    /// configuration error.
    pub fn from_matrix(
        countries: &[String],
        years: &[i32],
        cells: &[Vec<Option<f64>>],
    ) -> Result<Self> {
        ensure_unique("country", countries)?;
        ensure_unique("year", years)?;
        if cells.len() != countries.len() {
            return Err(DataError::TableShape {
                axis: "rows",
                expected: countries.len(),
                found: cells.len(),
            });
        }

        let mut values: HashMap<String, HashMap<i32, f64>> =
            HashMap::with_capacity(countries.len());
        for (country, row) in countries.iter().zip(cells) {
            if row.len() != years.len() {
                return Err(DataError::TableShape {
                    axis: "columns",
                    expected: years.len(),
                    found: row.len(),
                });
            }
            let entry = values.entry(country.clone()).or_default();
            for (&year, cell) in years.iter().zip(row) {
                if let Some(value) = *cell {
                    check_cell(country, year, value)?;
                    entry.insert(year, value);
                }
            }
        }

        Ok(Self { values })
    }

    /// Build a table whose rows and columns follow the roster order.
    pub fn from_roster_matrix(roster: &Roster, cells: &[Vec<Option<f64>>]) -> Result<Self> {
        Self::from_matrix(&roster.countries, &roster.years, cells)
    }

    /// Build a table from individual (country, year, value) entries.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i32, f64)>,
        S: Into<String>,
    {
        let mut values: HashMap<String, HashMap<i32, f64>> = HashMap::new();
        for (country, year, value) in entries {
            let country = country.into();
            check_cell(&country, year, value)?;
            values.entry(country).or_default().insert(year, value);
        }
        Ok(Self { values })
    }

    /// Indicator for a country in a year; `None` outside the table's domain.
    pub fn lookup(&self, country: &str, year: i32) -> Option<f64> {
        self.values.get(country)?.get(&year).copied()
    }

    /// Number of (country, year) entries.
    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Countries with at least one entry, sorted.
    pub fn countries(&self) -> Vec<&str> {
        let mut countries: Vec<&str> = self
            .values
            .iter()
            .filter(|(_, years)| !years.is_empty())
            .map(|(c, _)| c.as_str())
            .collect();
        countries.sort_unstable();
        countries
    }

    /// Years covered by any entry, sorted.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self
            .values
            .values()
            .flat_map(|years| years.keys().copied())
            .collect();
        years.into_iter().collect()
    }
}

impl IndicatorSource for EconomicTable {
    fn indicator(&self, country: &str, year: i32) -> Option<f64> {
        self.lookup(country, year)
    }
}

fn ensure_unique<T>(axis: &'static str, labels: &[T]) -> Result<()>
where
    T: Eq + std::hash::Hash + ToString,
{
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label) {
            return Err(DataError::DuplicateLabel {
                axis,
                label: label.to_string(),
            });
        }
    }
    Ok(())
}

fn check_cell(country: &str, year: i32, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DataError::InvalidIndicator {
            country: country.to_string(),
            year,
            value: value.to_string(),
        })
    }
}
