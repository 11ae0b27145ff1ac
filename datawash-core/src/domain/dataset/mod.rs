// datawash-core/src/domain/dataset/mod.rs

pub mod cell;
pub mod profile;

use std::collections::HashMap;
use std::sync::Arc;

use datafusion::arrow::array::{ArrayRef, BooleanArray};
use datafusion::arrow::compute::filter;
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::domain::error::DomainError;
pub use profile::{ColumnProfile, DatasetProfile, NumericSummary, TopValue};

/// Immutable table: an Arrow batch plus one stable id per row.
///
/// Ids are `0..n` at load time and follow their rows through filtering, so
/// quality results keep pointing at the row the user originally loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    batch: RecordBatch,
    row_ids: Vec<u64>,
}

pub(crate) fn build_batch(
    columns: Vec<(String, ArrayRef)>,
    num_rows: usize,
) -> Result<RecordBatch, DomainError> {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(name, array.data_type().clone(), true))
        .collect();
    let arrays: Vec<ArrayRef> = columns.into_iter().map(|(_, array)| array).collect();
    let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        arrays,
        &options,
    )?)
}

impl Dataset {
    pub fn new(batch: RecordBatch) -> Result<Self, DomainError> {
        let batch = cell::normalize_batch(batch)?;
        let row_ids = (0..batch.num_rows() as u64).collect();
        Ok(Self { batch, row_ids })
    }

    /// Builds a dataset from named columns of equal length.
    pub fn from_columns<N: Into<String>>(
        columns: impl IntoIterator<Item = (N, ArrayRef)>,
    ) -> Result<Self, DomainError> {
        let columns: Vec<(String, ArrayRef)> = columns
            .into_iter()
            .map(|(name, array)| (name.into(), array))
            .collect();
        let num_rows = columns.first().map_or(0, |(_, array)| array.len());
        Self::new(build_batch(columns, num_rows)?)
    }

    pub fn with_row_ids(batch: RecordBatch, row_ids: Vec<u64>) -> Result<Self, DomainError> {
        if row_ids.len() != batch.num_rows() {
            return Err(DomainError::InvalidDataset(format!(
                "{} row ids for {} rows",
                row_ids.len(),
                batch.num_rows()
            )));
        }
        let batch = cell::normalize_batch(batch)?;
        Ok(Self { batch, row_ids })
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn row_ids(&self) -> &[u64] {
        &self.row_ids
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().index_of(name).is_ok()
    }

    pub fn column(&self, name: &str) -> Result<&ArrayRef, DomainError> {
        let index = self
            .batch
            .schema()
            .index_of(name)
            .map_err(|_| DomainError::ColumnNotFound(name.to_string()))?;
        Ok(self.batch.column(index))
    }

    pub fn data_type(&self, name: &str) -> Result<DataType, DomainError> {
        Ok(self.column(name)?.data_type().clone())
    }

    /// Canonical dtype name (`int64`, `string`, `datetime`, ...).
    pub fn dtype_name(&self, name: &str) -> Result<String, DomainError> {
        Ok(cell::dtype_name(self.column(name)?.data_type()))
    }

    fn named_columns(&self) -> Vec<(String, ArrayRef)> {
        self.column_names()
            .into_iter()
            .zip(self.batch.columns().iter().cloned())
            .collect()
    }

    fn rebuild(&self, columns: Vec<(String, ArrayRef)>) -> Result<Self, DomainError> {
        let mut seen = std::collections::HashSet::new();
        for (name, _) in &columns {
            if !seen.insert(name.as_str()) {
                return Err(DomainError::InvalidDataset(format!(
                    "duplicate column name '{name}'"
                )));
            }
        }
        Ok(Self {
            batch: build_batch(columns, self.num_rows())?,
            row_ids: self.row_ids.clone(),
        })
    }

    pub fn drop_columns(&self, names: &[String]) -> Result<Self, DomainError> {
        for name in names {
            if !self.has_column(name) {
                return Err(DomainError::ColumnNotFound(name.clone()));
            }
        }
        let kept = self
            .named_columns()
            .into_iter()
            .filter(|(name, _)| !names.contains(name))
            .collect();
        self.rebuild(kept)
    }

    /// Renames columns through `mapping` (old -> new). Unknown keys are errors.
    pub fn rename_columns(&self, mapping: &[(String, String)]) -> Result<Self, DomainError> {
        for (old, _) in mapping {
            if !self.has_column(old) {
                return Err(DomainError::ColumnNotFound(old.clone()));
            }
        }
        let renamed = self
            .named_columns()
            .into_iter()
            .map(|(name, array)| {
                let new_name = mapping
                    .iter()
                    .find(|(old, _)| *old == name)
                    .map_or(name, |(_, new)| new.clone());
                (new_name, array)
            })
            .collect();
        self.rebuild(renamed)
    }

    /// Swaps one column's data in place, keeping its position.
    pub fn replace_column(&self, name: &str, array: ArrayRef) -> Result<Self, DomainError> {
        if array.len() != self.num_rows() {
            return Err(DomainError::InvalidDataset(format!(
                "column '{name}' has {} values for {} rows",
                array.len(),
                self.num_rows()
            )));
        }
        if !self.has_column(name) {
            return Err(DomainError::ColumnNotFound(name.to_string()));
        }
        let columns = self
            .named_columns()
            .into_iter()
            .map(|(col, existing)| {
                if col == name {
                    (col, array.clone())
                } else {
                    (col, existing)
                }
            })
            .collect();
        self.rebuild(columns)
    }

    /// Keeps the rows whose entry in `keep` is true. Row ids follow their rows.
    pub fn filter_rows(&self, keep: &[bool]) -> Result<Self, DomainError> {
        if keep.len() != self.num_rows() {
            return Err(DomainError::InvalidDataset(format!(
                "row mask has {} entries for {} rows",
                keep.len(),
                self.num_rows()
            )));
        }
        let mask = BooleanArray::from(keep.to_vec());
        let mut columns = Vec::with_capacity(self.num_columns());
        for (name, array) in self.named_columns() {
            columns.push((name, filter(array.as_ref(), &mask)?));
        }
        let row_ids: Vec<u64> = self
            .row_ids
            .iter()
            .zip(keep)
            .filter_map(|(id, keep)| keep.then_some(*id))
            .collect();
        Ok(Self {
            batch: build_batch(columns, row_ids.len())?,
            row_ids,
        })
    }

    /// Row id -> current position.
    pub fn row_positions(&self) -> HashMap<u64, usize> {
        self.row_ids
            .iter()
            .enumerate()
            .map(|(position, id)| (*id, position))
            .collect()
    }

    /// Display strings for the first `limit` rows.
    pub fn display_rows(&self, limit: usize) -> Result<Vec<Vec<String>>, DomainError> {
        let positions: Vec<usize> = (0..self.num_rows().min(limit)).collect();
        self.display_positions(&positions)
    }

    /// Display strings for the given row positions, in the given order.
    pub fn display_positions(&self, positions: &[usize]) -> Result<Vec<Vec<String>>, DomainError> {
        let columns = self
            .batch
            .columns()
            .iter()
            .map(cell::display_column)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(positions
            .iter()
            .filter(|p| **p < self.num_rows())
            .map(|p| columns.iter().map(|col| col[*p].clone()).collect())
            .collect())
    }

    pub fn profile(&self) -> Result<DatasetProfile, DomainError> {
        profile::profile(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use datafusion::arrow::array::{Int64Array, StringArray};

    fn sample() -> Dataset {
        Dataset::from_columns([
            (
                "id",
                Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef,
            ),
            (
                "name",
                Arc::new(StringArray::from(vec!["a", "b", "c"])) as ArrayRef,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_drop_and_rename() -> anyhow::Result<()> {
        let ds = sample();
        let dropped = ds.drop_columns(&["id".to_string()])?;
        assert_eq!(dropped.column_names(), vec!["name"]);
        assert_eq!(dropped.num_rows(), 3);

        let renamed = ds.rename_columns(&[("name".to_string(), "label".to_string())])?;
        assert_eq!(renamed.column_names(), vec!["id", "label"]);

        assert!(matches!(
            ds.drop_columns(&["nope".to_string()]),
            Err(DomainError::ColumnNotFound(_))
        ));
        assert!(matches!(
            ds.rename_columns(&[("id".to_string(), "name".to_string())]),
            Err(DomainError::InvalidDataset(_))
        ));
        Ok(())
    }

    #[test]
    fn test_dropping_every_column_keeps_row_count() -> anyhow::Result<()> {
        let ds = sample().drop_columns(&["id".to_string(), "name".to_string()])?;
        assert_eq!(ds.num_columns(), 0);
        assert_eq!(ds.num_rows(), 3);
        Ok(())
    }

    #[test]
    fn test_filter_keeps_row_ids() -> anyhow::Result<()> {
        let filtered = sample().filter_rows(&[true, false, true])?;
        assert_eq!(filtered.row_ids(), &[0, 2]);
        assert_eq!(
            filtered.display_rows(10)?,
            vec![vec!["1".to_string(), "a".to_string()], vec!["3".to_string(), "c".to_string()]]
        );
        assert_eq!(filtered.row_positions().get(&2), Some(&1));
        Ok(())
    }

    #[test]
    fn test_transformations_leave_input_untouched() -> anyhow::Result<()> {
        let ds = sample();
        let before = ds.clone();
        let _ = ds.drop_columns(&["name".to_string()])?;
        let _ = ds.filter_rows(&[false, false, false])?;
        assert_eq!(ds, before);
        Ok(())
    }
}
