//! One-call feature preparation for a loaded dataset.

use crate::error::Result;
use stickers_data::{Dataset, DatasetHandle};
use stickers_features::{FeaturePipeline, FeatureSet};
use tracing::info;

/// Run the feature pipeline over a dataset, validating against its roster.
///
/// Day density uses the roster's series count, so a series that is absent
/// on some days lowers the density of its year.
pub fn prepare_features(dataset: &Dataset) -> Result<FeatureSet> {
    let pipeline = FeaturePipeline::with_roster(dataset.roster.clone());
    let set = pipeline.run(&dataset.records, &dataset.economic)?;
    info!(
        rows = set.len(),
        stores = set.store_factors.len(),
        products = set.product_factors.len(),
        "features prepared"
    );
    Ok(set)
}

/// Run the feature pipeline over the current contents of a dataset handle,
/// reloading the sources first if they changed on disk.
pub fn prepare_with_handle(handle: &mut DatasetHandle) -> Result<FeatureSet> {
    let dataset = handle.get()?;
    prepare_features(dataset)
}
