// datawash-core/src/domain/dataset/profile.rs

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::Value;

use super::{Dataset, cell};
use crate::domain::error::DomainError;

pub const TOP_VALUES: usize = 10;

/// Distribution of the non-missing values of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub mean: f64,
    /// Sample standard deviation; needs two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopValue {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub missing: usize,
    pub missing_pct: f64,
    pub distinct: usize,
    /// Set for numeric columns holding at least one value.
    pub numeric: Option<NumericSummary>,
    /// Most frequent values of non-numeric columns, by descending count.
    pub top_values: Vec<TopValue>,
}

impl ColumnProfile {
    pub fn most_frequent(&self) -> Option<&TopValue> {
        self.top_values.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
}

fn text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Linear interpolation between closest ranks. `sorted` must not be empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn summarize(mut values: Vec<f64>) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (values.len() > 1).then(|| {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        var.sqrt()
    });
    Some(NumericSummary {
        mean,
        std,
        min: values[0],
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values[values.len() - 1],
    })
}

fn top_values(values: Vec<String>) -> Vec<TopValue> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut top: Vec<TopValue> = counts
        .into_iter()
        .map(|(value, count)| TopValue { value, count })
        .collect();
    top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    top.truncate(TOP_VALUES);
    top
}

pub(super) fn profile(dataset: &Dataset) -> Result<DatasetProfile, DomainError> {
    let rows = dataset.num_rows();
    let mut columns = Vec::with_capacity(dataset.num_columns());

    for name in dataset.column_names() {
        let array = dataset.column(&name)?;
        let missing = cell::missing_mask(array)?.into_iter().filter(|m| *m).count();
        let present: Vec<String> = cell::json_column(array)?
            .into_iter()
            .filter(|v| !v.is_null())
            .map(text)
            .collect();
        let distinct = present.iter().collect::<HashSet<_>>().len();
        let missing_pct = if rows == 0 {
            0.0
        } else {
            missing as f64 * 100.0 / rows as f64
        };

        let (numeric, top) = if cell::is_numeric(array.data_type()) {
            let values = cell::numeric_column(array)?
                .into_iter()
                .filter_map(|c| c.value())
                .collect();
            (summarize(values), Vec::new())
        } else {
            (None, top_values(present))
        };

        columns.push(ColumnProfile {
            dtype: cell::dtype_name(array.data_type()),
            name,
            missing,
            missing_pct,
            distinct,
            numeric,
            top_values: top,
        });
    }

    Ok(DatasetProfile { rows, columns })
}
