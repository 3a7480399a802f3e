//! CSV sources for sales partitions and the economic indicator table.
//!
//! Sales files use the columns `id,date,country,store,product[,num_sold]`;
//! the forecast file has no `num_sold` column. The economic table lists one
//! column per year, optionally preceded by a `country` column. Without a
//! country column, rows are matched to the roster's countries by position.

use crate::economic::EconomicTable;
use crate::error::{DataError, Result};
use crate::record::{Partition, SalesRecord};
use crate::roster::Roster;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Raw sales row as it appears in the CSV files.
#[derive(Debug, Deserialize)]
struct RawSalesRow {
    id: u64,
    date: String,
    country: String,
    store: String,
    product: String,
    #[serde(default)]
    num_sold: Option<f64>,
}

/// Read sales records from CSV, tagging each row with `partition`.
///
/// Empty or NaN `num_sold` cells become missing quantities. Forecast rows
/// never carry a quantity, even if the file has one.
pub fn read_sales<R: Read>(reader: R, partition: Partition) -> Result<Vec<SalesRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for row in rdr.deserialize() {
        let raw: RawSalesRow = row?;
        let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d").map_err(|_| {
            DataError::InvalidDate {
                id: raw.id,
                value: raw.date.clone(),
            }
        })?;

        let quantity = match partition {
            Partition::Forecast => None,
            Partition::Historical => raw.num_sold.filter(|q| !q.is_nan()),
        };
        if let Some(q) = quantity.filter(|q| *q < 0.0) {
            return Err(DataError::NegativeQuantity {
                id: raw.id,
                quantity: q,
            });
        }

        records.push(SalesRecord {
            id: raw.id,
            date,
            country: raw.country,
            store: raw.store,
            product: raw.product,
            quantity,
            partition,
        });
    }

    debug!(partition = %partition, rows = records.len(), "read sales records");
    Ok(records)
}

/// Read sales records from a CSV file.
pub fn read_sales_file<P: AsRef<Path>>(path: P, partition: Partition) -> Result<Vec<SalesRecord>> {
    read_sales(File::open(path)?, partition)
}

/// Read the economic indicator table from CSV and validate it against the
/// roster.
///
/// The header must list years (as integers). If the roster has years, the
/// year columns must be exactly those years; otherwise any distinct years
/// are accepted. The rows must cover each roster country exactly once.
/// Record years beyond the last column are not an error here: their lookups
/// are simply missing.
pub fn read_economic<R: Read>(reader: R, roster: &Roster) -> Result<EconomicTable> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let has_country_column = headers
        .get(0)
        .is_some_and(|h| h.trim().parse::<f64>().is_err());
    let year_labels = headers.iter().skip(usize::from(has_country_column));

    let mut years = Vec::new();
    for label in year_labels {
        let year = parse_year(label)?;
        if !roster.years.is_empty() && !roster.contains_year(year) {
            return Err(DataError::UnknownYear(label.to_string()));
        }
        years.push(year);
    }
    if !roster.years.is_empty() && years.len() != roster.years.len() {
        return Err(DataError::TableShape {
            axis: "columns",
            expected: roster.years.len(),
            found: years.len(),
        });
    }

    let mut countries = Vec::new();
    let mut cells = Vec::new();
    for (index, row) in rdr.records().enumerate() {
        let row = row?;
        let mut fields = row.iter();

        let country = if has_country_column {
            let name = fields.next().unwrap_or_default().trim().to_string();
            if !roster.contains_country(&name) {
                return Err(DataError::UnknownCountry(name));
            }
            name
        } else {
            match roster.countries.get(index) {
                Some(name) => name.clone(),
                None => {
                    return Err(DataError::TableShape {
                        axis: "rows",
                        expected: roster.countries.len(),
                        found: index + 1,
                    });
                }
            }
        };

        let mut values = Vec::with_capacity(years.len());
        for (position, field) in fields.enumerate() {
            let year = years.get(position).copied().unwrap_or_default();
            values.push(parse_cell(&country, year, field)?);
        }
        countries.push(country);
        cells.push(values);
    }

    if countries.len() != roster.countries.len() {
        return Err(DataError::TableShape {
            axis: "rows",
            expected: roster.countries.len(),
            found: countries.len(),
        });
    }

    EconomicTable::from_matrix(&countries, &years, &cells)
}

/// Read the economic indicator table from a CSV file.
pub fn read_economic_file<P: AsRef<Path>>(path: P, roster: &Roster) -> Result<EconomicTable> {
    read_economic(File::open(path)?, roster)
}

fn parse_year(label: &str) -> Result<i32> {
    label
        .trim()
        .parse::<i32>()
        .map_err(|_| DataError::Parse(format!("Invalid year column '{}'", label)))
}

fn parse_cell(country: &str, year: i32, field: &str) -> Result<Option<f64>> {
    let text = field.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| DataError::InvalidIndicator {
            country: country.to_string(),
            year,
            value: text.to_string(),
        })
}

/// Locations of the input files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePaths {
    /// Historical sales CSV
    pub historical: PathBuf,
    /// Forecast sales CSV
    pub forecast: PathBuf,
    /// Economic indicator CSV
    pub economic: PathBuf,
    /// Optional roster JSON; inferred from the records when absent
    #[serde(default)]
    pub roster: Option<PathBuf>,
}

impl SourcePaths {
    /// Create paths without an explicit roster.
    pub fn new(
        historical: impl Into<PathBuf>,
        forecast: impl Into<PathBuf>,
        economic: impl Into<PathBuf>,
    ) -> Self {
        Self {
            historical: historical.into(),
            forecast: forecast.into(),
            economic: economic.into(),
            roster: None,
        }
    }

    /// Use an explicit roster file.
    pub fn with_roster(mut self, roster: impl Into<PathBuf>) -> Self {
        self.roster = Some(roster.into());
        self
    }

    /// All files whose changes invalidate a loaded dataset.
    pub fn files(&self) -> Vec<&Path> {
        let mut files = vec![
            self.historical.as_path(),
            self.forecast.as_path(),
            self.economic.as_path(),
        ];
        if let Some(roster) = &self.roster {
            files.push(roster.as_path());
        }
        files
    }
}

/// A fully loaded and validated dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Historical rows followed by forecast rows
    pub records: Vec<SalesRecord>,
    /// Economic indicator table
    pub economic: EconomicTable,
    /// Roster the records and table were validated against
    pub roster: Roster,
}

impl Dataset {
    /// Assemble a dataset from already-loaded parts, validating the records
    /// against the roster.
    pub fn new(records: Vec<SalesRecord>, economic: EconomicTable, roster: Roster) -> Result<Self> {
        roster.validate_records(&records)?;
        Ok(Self {
            records,
            economic,
            roster,
        })
    }

    /// Load both partitions, the roster and the economic table.
    pub fn load(paths: &SourcePaths) -> Result<Self> {
        let mut records = read_sales_file(&paths.historical, Partition::Historical)?;
        records.extend(read_sales_file(&paths.forecast, Partition::Forecast)?);

        let mut roster = match &paths.roster {
            Some(path) => Roster::from_json_file(path)?,
            None => Roster::infer(&records),
        };
        roster.validate_records(&records)?;

        let economic = read_economic_file(&paths.economic, &roster)?;
        if roster.years.is_empty() {
            roster.years = economic.years();
        }
        let uncovered: BTreeSet<i32> = records
            .iter()
            .map(SalesRecord::year)
            .filter(|year| !roster.contains_year(*year))
            .collect();
        if !uncovered.is_empty() {
            debug!(years = ?uncovered, "record years without economic columns");
        }
        info!(
            records = records.len(),
            countries = roster.countries.len(),
            indicators = economic.len(),
            "loaded dataset"
        );

        Ok(Self {
            records,
            economic,
            roster,
        })
    }

    /// Historical records.
    pub fn historical(&self) -> impl Iterator<Item = &SalesRecord> {
        self.records.iter().filter(|r| r.partition.is_historical())
    }

    /// Forecast records.
    pub fn forecast(&self) -> impl Iterator<Item = &SalesRecord> {
        self.records.iter().filter(|r| !r.partition.is_historical())
    }
}
