#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stickers-rs/stickers/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod frame;
pub mod summary;

pub use export::{ExportError, ExportFormat, Exporter, FactorExport, FeatureRowExport};
pub use frame::{IDENTITY_COLUMNS, factors_to_frame, features_to_frame};
pub use summary::{MissingnessReport, SummaryDimension, daily_totals, yearly_totals};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
