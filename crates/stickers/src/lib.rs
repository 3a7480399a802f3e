#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stickers-rs/stickers/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod prepare;

// Re-export main types from sub-crates
pub use stickers_data as data;
pub use stickers_features as features;
pub use stickers_output as output;

pub use error::{Result, StickersError};
pub use prepare::{prepare_features, prepare_with_handle};

/// Commonly used types.
pub mod prelude {
    pub use stickers_data::{
        Dataset, DatasetHandle, EconomicTable, IndicatorSource, Partition, Roster, SalesRecord,
        SourcePaths,
    };
    pub use stickers_features::{
        CategoryField, DerivedFeatureRow, FeaturePipeline, FeatureSet, PipelineConfig,
    };
    pub use stickers_output::{ExportFormat, Exporter, MissingnessReport, SummaryDimension};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
