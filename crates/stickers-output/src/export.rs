//! Export functionality for pipeline output.
//!
//! CSV and JSON export of derived feature rows and category factor tables.
//! Missing values are written as empty CSV fields and JSON `null`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use stickers_features::{CategoryFactors, DerivedFeatureRow, FeatureSet};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output was not valid UTF-8.
    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// One derived feature row, flattened for export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureRowExport {
    /// Record id.
    pub id: u64,
    /// Record date.
    pub date: NaiveDate,
    /// Country label.
    pub country: String,
    /// Store label.
    pub store: String,
    /// Product label.
    pub product: String,
    /// Quantity sold.
    pub quantity: Option<f64>,
    /// Partition tag.
    pub partition: String,
    /// Calendar year.
    pub year: i32,
    /// Month.
    pub month: u32,
    /// Weekday, Monday = 0.
    pub weekday: u32,
    /// Day of year.
    pub day_of_year: u32,
    /// Day index.
    pub day_index: i64,
    /// Week index.
    pub week_index: i64,
    /// Day density of the year.
    pub day_density: Option<f64>,
    /// Single-year position.
    pub part_of_year: Option<f64>,
    /// Two-year position.
    pub part_of_two_years: Option<f64>,
    /// sin(2πp)
    pub sin_t: Option<f64>,
    /// cos(2πp)
    pub cos_t: Option<f64>,
    /// sin(4πp)
    pub sin_2t: Option<f64>,
    /// cos(4πp)
    pub cos_2t: Option<f64>,
    /// sin(6πp)
    pub sin_3t: Option<f64>,
    /// cos(6πp)
    pub cos_3t: Option<f64>,
    /// sin(8πp)
    pub sin_4t: Option<f64>,
    /// cos(8πp)
    pub cos_4t: Option<f64>,
    /// sin(πp′)
    pub sin_half_t: Option<f64>,
    /// cos(πp′)
    pub cos_half_t: Option<f64>,
    /// Economic indicator.
    pub economic_indicator: Option<f64>,
    /// Store factor.
    pub store_factor: Option<f64>,
    /// Product factor.
    pub product_factor: Option<f64>,
}

impl From<&DerivedFeatureRow> for FeatureRowExport {
    fn from(row: &DerivedFeatureRow) -> Self {
        let h = row.harmonics;
        Self {
            id: row.id,
            date: row.date,
            country: row.country.clone(),
            store: row.store.clone(),
            product: row.product.clone(),
            quantity: row.quantity,
            partition: row.partition.to_string(),
            year: row.calendar.year,
            month: row.calendar.month,
            weekday: row.calendar.weekday,
            day_of_year: row.calendar.day_of_year,
            day_index: row.calendar.day_index,
            week_index: row.calendar.week_index,
            day_density: row.day_density,
            part_of_year: row.position.map(|p| p.part_of_year),
            part_of_two_years: row.position.map(|p| p.part_of_two_years),
            sin_t: h.map(|h| h.t.sin),
            cos_t: h.map(|h| h.t.cos),
            sin_2t: h.map(|h| h.t2.sin),
            cos_2t: h.map(|h| h.t2.cos),
            sin_3t: h.map(|h| h.t3.sin),
            cos_3t: h.map(|h| h.t3.cos),
            sin_4t: h.map(|h| h.t4.sin),
            cos_4t: h.map(|h| h.t4.cos),
            sin_half_t: h.map(|h| h.half.sin),
            cos_half_t: h.map(|h| h.half.cos),
            economic_indicator: row.economic_indicator,
            store_factor: row.store_factor,
            product_factor: row.product_factor,
        }
    }
}

/// One category factor, flattened for export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FactorExport {
    /// Category field ("store" or "product").
    pub field: String,
    /// Category value.
    pub category: String,
    /// Mean historical quantity.
    pub factor: f64,
    /// Number of rows the factor was estimated from.
    pub observations: usize,
}

impl FactorExport {
    /// Flatten a factor mapping.
    pub fn from_factors(factors: &CategoryFactors) -> Vec<Self> {
        let field = factors.field().to_string();
        factors
            .iter()
            .map(|(category, factor)| Self {
                field: field.clone(),
                category: category.to_string(),
                factor,
                observations: factors.observations(category),
            })
            .collect()
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        debug!(path = %path.display(), bytes = content.len(), "export written");
        Ok(())
    }
}

fn to_csv<'a, T, I>(records: I) -> Result<String, ExportError>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn export_records<T: Serialize>(records: &[T], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Json => Ok(serde_json::to_string(records)?),
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(records)?),
    }
}

impl Exporter for Vec<FeatureRowExport> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        export_records(self, format)
    }
}

impl Exporter for Vec<FactorExport> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        export_records(self, format)
    }
}

impl Exporter for CategoryFactors {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        FactorExport::from_factors(self).export_to_string(format)
    }
}

impl Exporter for FeatureSet {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        let rows: Vec<FeatureRowExport> = self.rows.iter().map(FeatureRowExport::from).collect();
        rows.export_to_string(format)
    }
}
