// datawash-core/src/ports/source.rs

use std::path::Path;

use async_trait::async_trait;

use crate::domain::dataset::Dataset;
use crate::error::DatawashError;

/// Loads a tabular file into a [`Dataset`] with fresh row ids.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn read(&self, path: &Path) -> Result<Dataset, DatawashError>;
}

#[async_trait]
pub trait DatasetSink: Send + Sync {
    async fn write(&self, dataset: &Dataset, path: &Path) -> Result<(), DatawashError>;
}
