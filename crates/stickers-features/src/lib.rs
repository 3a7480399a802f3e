#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stickers-rs/stickers/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod calendar;
pub mod category;
pub mod error;
pub mod harmonic;
pub mod joiner;
pub mod pipeline;
pub mod registry;

pub use calendar::{CalendarAttributes, CalendarStage, YearDensity, distinct_series};
pub use category::{CategoryFactorEstimator, CategoryFactors, CategoryField};
pub use error::{FeatureError, Result};
pub use harmonic::{Cycle, HarmonicEncoder, HarmonicFeatures, HarmonicPair, Position};
pub use joiner::EconomicJoiner;
pub use pipeline::{DerivedFeatureRow, DesignMatrix, FeaturePipeline, FeatureSet, PipelineConfig};

// Re-export registry types for convenience
pub use registry::{
    FeatureGroup, FeatureInfo, available_features, features_by_group, get_feature_info,
    list_feature_names, model_input_names,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
