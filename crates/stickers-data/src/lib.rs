#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stickers-rs/stickers/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod economic;
pub mod error;
pub mod record;
pub mod roster;
pub mod source;

pub use cache::DatasetHandle;
pub use economic::{EconomicTable, IndicatorSource};
pub use error::{DataError, Result};
pub use record::{Partition, SalesRecord};
pub use roster::{Roster, RosterField};
pub use source::{
    Dataset, SourcePaths, read_economic, read_economic_file, read_sales, read_sales_file,
};

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
