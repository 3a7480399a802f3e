//! Calendar decomposition
//!
//! Derives per-row calendar attributes on a single day axis spanning both
//! partitions, and the per-year day density used to normalize position in
//! the year. Density is measured from the data rather than taken from the
//! calendar, so a year that starts on January 1st but ends early (a short
//! forecast horizon) still folds onto `[0, 1)`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use stickers_data::SalesRecord;

/// Calendar attributes of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarAttributes {
    /// Calendar year
    pub year: i32,
    /// Month (1-12)
    pub month: u32,
    /// Weekday, Monday = 0 through Sunday = 6
    pub weekday: u32,
    /// Day of year (1-based)
    pub day_of_year: u32,
    /// Days since the earliest date in the dataset
    pub day_index: i64,
    /// `day_index` div 7
    pub week_index: i64,
}

impl CalendarAttributes {
    /// Decompose `date` relative to `epoch`.
    pub fn from_date(date: NaiveDate, epoch: NaiveDate) -> Self {
        let day_index = (date - epoch).num_days();
        Self {
            year: date.year(),
            month: date.month(),
            weekday: date.weekday().num_days_from_monday(),
            day_of_year: date.ordinal(),
            day_index,
            week_index: day_index.div_euclid(7),
        }
    }
}

/// Rows per series for each calendar year ("day is in year").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearDensity {
    densities: BTreeMap<i32, f64>,
}

impl YearDensity {
    /// Measure density from the records: rows in each year divided by the
    /// number of series.
    ///
    /// With zero series every observed year gets density 0.
    pub fn measure(records: &[SalesRecord], series_count: usize) -> Self {
        let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
        for record in records {
            *counts.entry(record.year()).or_insert(0) += 1;
        }

        let densities = counts
            .into_iter()
            .map(|(year, count)| {
                let density = if series_count == 0 {
                    0.0
                } else {
                    count as f64 / series_count as f64
                };
                (year, density)
            })
            .collect();

        Self { densities }
    }

    /// Density for a year, if the year was observed.
    pub fn get(&self, year: i32) -> Option<f64> {
        self.densities.get(&year).copied()
    }

    /// Iterate over (year, density) in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.densities.iter().map(|(&y, &d)| (y, d))
    }

    /// Number of years observed.
    pub fn len(&self) -> usize {
        self.densities.len()
    }

    /// Returns true if no year was observed.
    pub fn is_empty(&self) -> bool {
        self.densities.is_empty()
    }
}

/// Number of distinct (country, store, product) series in the records.
pub fn distinct_series(records: &[SalesRecord]) -> usize {
    records
        .iter()
        .map(SalesRecord::series)
        .collect::<HashSet<_>>()
        .len()
}

/// Output of the calendar stage.
#[derive(Debug, Clone, Default)]
pub struct CalendarStage {
    /// Earliest date across all records
    pub epoch: Option<NaiveDate>,
    /// Attributes, one per record in input order
    pub attributes: Vec<CalendarAttributes>,
    /// Per-year day density
    pub density: YearDensity,
}

impl CalendarStage {
    /// Run the calendar stage over all records.
    pub fn run(records: &[SalesRecord], series_count: usize) -> Self {
        let Some(epoch) = records.iter().map(|r| r.date).min() else {
            return Self::default();
        };

        let attributes = records
            .iter()
            .map(|r| CalendarAttributes::from_date(r.date, epoch))
            .collect();

        Self {
            epoch: Some(epoch),
            attributes,
            density: YearDensity::measure(records, series_count),
        }
    }
}
