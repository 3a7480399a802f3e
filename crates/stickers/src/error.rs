//! Error types for the umbrella crate.

use stickers_data::DataError;
use stickers_features::FeatureError;
use thiserror::Error;

/// Result type for end-to-end preparation.
pub type Result<T> = std::result::Result<T, StickersError>;

/// Errors from loading sources or running the pipeline.
#[derive(Debug, Error)]
pub enum StickersError {
    /// Loading or validating the sources failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// The pipeline run failed
    #[error(transparent)]
    Feature(#[from] FeatureError),
}
