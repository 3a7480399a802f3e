//! Caller-owned dataset cache.
//!
//! A [`DatasetHandle`] keeps a loaded [`Dataset`] together with the
//! modification times of the files it was read from. Accessing the dataset
//! reloads it first when any of those files changed on disk.

use crate::error::Result;
use crate::source::{Dataset, SourcePaths};
use std::path::Path;
use std::time::SystemTime;
use tracing::info;

/// Cached dataset with reload-on-change semantics.
#[derive(Debug)]
pub struct DatasetHandle {
    paths: SourcePaths,
    dataset: Dataset,
    stamps: Vec<SystemTime>,
    invalidated: bool,
    loads: usize,
}

impl DatasetHandle {
    /// Load the dataset and start tracking its source files.
    pub fn open(paths: SourcePaths) -> Result<Self> {
        let stamps = modification_times(&paths)?;
        let dataset = Dataset::load(&paths)?;
        Ok(Self {
            paths,
            dataset,
            stamps,
            invalidated: false,
            loads: 1,
        })
    }

    /// The dataset, reloaded first if a source file changed or the handle
    /// was invalidated.
    pub fn get(&mut self) -> Result<&Dataset> {
        if self.is_stale()? {
            self.reload()?;
        }
        Ok(&self.dataset)
    }

    /// Whether the next [`get`](Self::get) will reload.
    pub fn is_stale(&self) -> Result<bool> {
        if self.invalidated {
            return Ok(true);
        }
        Ok(modification_times(&self.paths)? != self.stamps)
    }

    /// Force a reload on the next access.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// Reload unconditionally.
    ///
    /// On failure the previously loaded dataset is kept and the handle stays
    /// stale.
    pub fn reload(&mut self) -> Result<&Dataset> {
        let stamps = modification_times(&self.paths)?;
        let dataset = Dataset::load(&self.paths)?;
        self.dataset = dataset;
        self.stamps = stamps;
        self.invalidated = false;
        self.loads += 1;
        info!(loads = self.loads, "reloaded dataset");
        Ok(&self.dataset)
    }

    /// Source file locations.
    pub const fn paths(&self) -> &SourcePaths {
        &self.paths
    }

    /// Number of times the dataset has been loaded.
    pub const fn load_count(&self) -> usize {
        self.loads
    }
}

fn modification_times(paths: &SourcePaths) -> Result<Vec<SystemTime>> {
    paths.files().into_iter().map(modified).collect()
}

fn modified(path: &Path) -> Result<SystemTime> {
    Ok(std::fs::metadata(path)?.modified()?)
}
