//! Error types for data operations.

use crate::roster::RosterField;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading or validating input data.
#[derive(Debug, Error)]
pub enum DataError {
    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Unparseable date on a sales row
    #[error("Invalid date '{value}' on record {id}")]
    InvalidDate {
        /// Record id
        id: u64,
        /// Raw date text
        value: String,
    },

    /// Negative quantity on a sales row
    #[error("Negative quantity {quantity} on record {id}")]
    NegativeQuantity {
        /// Record id
        id: u64,
        /// Offending quantity
        quantity: f64,
    },

    /// Economic table shape does not match the rosters
    #[error("Economic table shape mismatch: expected {expected} {axis}, found {found}")]
    TableShape {
        /// Which axis mismatched ("rows" or "columns")
        axis: &'static str,
        /// Expected count from the roster
        expected: usize,
        /// Count found in the table
        found: usize,
    },

    /// Economic table repeats a country row or a year column
    #[error("Economic table repeats {axis} '{label}'")]
    DuplicateLabel {
        /// Which axis repeated ("country" or "year")
        axis: &'static str,
        /// Repeated label
        label: String,
    },

    /// Economic table cell is not a non-negative number
    #[error("Invalid economic indicator for {country} in {year}: {value}")]
    InvalidIndicator {
        /// Country label of the row
        country: String,
        /// Year label of the column
        year: i32,
        /// Raw cell value
        value: String,
    },

    /// Economic table references a country outside the roster
    #[error("Unknown country in economic table: {0}")]
    UnknownCountry(String),

    /// Economic table year column outside the roster
    #[error("Year outside the roster: {0}")]
    UnknownYear(String),

    /// Sales record references a value outside the roster
    #[error("Record {id} has {field} '{value}' which is not in the roster")]
    NotInRoster {
        /// Record id
        id: u64,
        /// Roster field that was violated
        field: RosterField,
        /// Offending value
        value: String,
    },
}
