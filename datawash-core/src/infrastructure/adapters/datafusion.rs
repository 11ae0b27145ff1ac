// datawash-core/src/infrastructure/adapters/datafusion.rs

use async_trait::async_trait;
use datafusion::arrow::compute::concat_batches;
use datafusion::dataframe::DataFrameWriteOptions;
use datafusion::prelude::*;
use std::path::Path;
use tracing::{info, instrument};

// Hexagonal Imports
use crate::domain::dataset::Dataset;
use crate::domain::error::DomainError;
use crate::error::DatawashError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::source::{DatasetSink, DatasetSource};

/// File formats, picked from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    /// Newline-delimited JSON.
    NdJson,
    Parquet,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Result<Self, InfrastructureError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(DataFormat::Csv),
            "json" | "jsonl" | "ndjson" => Ok(DataFormat::NdJson),
            "parquet" | "pq" => Ok(DataFormat::Parquet),
            _ => Err(InfrastructureError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }
}

fn path_str(path: &Path) -> Result<&str, DatawashError> {
    path.to_str()
        .ok_or_else(|| DatawashError::InternalError(format!("Invalid path: {:?}", path)))
}

/// Reads and writes datasets through a DataFusion session.
pub struct DataFusionAdapter {
    ctx: SessionContext,
}

impl DataFusionAdapter {
    pub fn new() -> Self {
        Self {
            ctx: SessionContext::new(),
        }
    }
}

impl Default for DataFusionAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatasetSource for DataFusionAdapter {
    #[instrument(skip(self))]
    async fn read(&self, path: &Path) -> Result<Dataset, DatawashError> {
        let format = DataFormat::from_path(path)?;
        let location = path_str(path)?;
        // DataFusion filters listed files by extension, so pass the real one.
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();

        let df = match format {
            DataFormat::Csv => {
                self.ctx
                    .read_csv(location, CsvReadOptions::new().file_extension(&extension))
                    .await
            }
            DataFormat::NdJson => {
                self.ctx
                    .read_json(
                        location,
                        NdJsonReadOptions::default().file_extension(&extension),
                    )
                    .await
            }
            DataFormat::Parquet => {
                self.ctx
                    .read_parquet(
                        location,
                        ParquetReadOptions {
                            file_extension: &extension,
                            ..Default::default()
                        },
                    )
                    .await
            }
        }
        .map_err(InfrastructureError::from)?;

        let schema = df.schema().inner().clone();
        let batches = df.collect().await.map_err(InfrastructureError::from)?;
        let batch = concat_batches(&schema, &batches).map_err(DomainError::from)?;

        let dataset = Dataset::new(batch)?;
        info!(
            rows = dataset.num_rows(),
            columns = dataset.num_columns(),
            "Dataset loaded"
        );
        Ok(dataset)
    }
}

#[async_trait]
impl DatasetSink for DataFusionAdapter {
    #[instrument(skip(self, dataset), fields(rows = dataset.num_rows()))]
    async fn write(&self, dataset: &Dataset, path: &Path) -> Result<(), DatawashError> {
        let format = DataFormat::from_path(path)?;
        let location = path_str(path)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        if path.exists() {
            tokio::fs::remove_file(path).await?;
        }

        let df = self
            .ctx
            .read_batch(dataset.batch().clone())
            .map_err(InfrastructureError::from)?;
        let options = DataFrameWriteOptions::new().with_single_file_output(true);

        match format {
            DataFormat::Csv => df.write_csv(location, options, None).await,
            DataFormat::NdJson => df.write_json(location, options, None).await,
            DataFormat::Parquet => df.write_parquet(location, options, None).await,
        }
        .map_err(InfrastructureError::from)?;

        info!(path = %location, "Dataset written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::cell;
    use anyhow::Result;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DataFormat::from_path(Path::new("a/b.CSV")).ok(),
            Some(DataFormat::Csv)
        );
        assert_eq!(
            DataFormat::from_path(Path::new("x.jsonl")).ok(),
            Some(DataFormat::NdJson)
        );
        assert!(matches!(
            DataFormat::from_path(Path::new("sheet.xlsx")),
            Err(InfrastructureError::UnsupportedFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_csv_read_and_write_back() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let input = tmp.path().join("people.csv");
        fs::write(&input, "id,name,age\n1,Ann,30\n2,Bob,\n3,Cid,41\n")?;

        let adapter = DataFusionAdapter::new();
        let ds = adapter.read(&input).await?;
        assert_eq!(ds.num_rows(), 3);
        assert_eq!(ds.column_names(), vec!["id", "name", "age"]);
        assert_eq!(ds.dtype_name("name")?, "string");
        assert_eq!(
            cell::json_column(ds.column("age")?)?,
            vec![json!(30), serde_json::Value::Null, json!(41)]
        );

        let output = tmp.path().join("out").join("clean.csv");
        adapter.write(&ds, &output).await?;
        let again = adapter.read(&output).await?;
        assert_eq!(again.num_rows(), 3);
        assert_eq!(again.column_names(), ds.column_names());
        Ok(())
    }

    #[tokio::test]
    async fn test_ndjson_and_parquet() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let input = tmp.path().join("rows.json");
        fs::write(&input, "{\"a\": 1, \"b\": \"x\"}\n{\"a\": 2, \"b\": \"y\"}\n")?;

        let adapter = DataFusionAdapter::new();
        let ds = adapter.read(&input).await?;
        assert_eq!(ds.num_rows(), 2);

        let parquet = tmp.path().join("rows.parquet");
        adapter.write(&ds, &parquet).await?;
        let back = adapter.read(&parquet).await?;
        assert_eq!(back.num_rows(), 2);
        assert_eq!(back.dtype_name("b")?, "string");
        Ok(())
    }
}
