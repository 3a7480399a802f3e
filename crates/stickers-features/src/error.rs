//! Error types for feature engineering.

use thiserror::Error;

/// Result type for feature engineering.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors that can abort a pipeline run.
///
/// Per-row missing values are never errors; they are carried as `None` in
/// the derived rows.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Records failed validation against the configured roster
    #[error("Roster validation failed: {0}")]
    Roster(#[from] stickers_data::DataError),
}
