// datawash-core/src/application/transforms/missing.rs

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use datafusion::arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, UInt64Array,
};
use datafusion::arrow::compute::{CastOptions, cast, cast_with_options};
use datafusion::arrow::datatypes::DataType;
use serde_json::Value;

use crate::domain::dataset::Dataset;
use crate::domain::dataset::cell;
use crate::domain::error::DomainError;
use crate::domain::params::{self, Params};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Drop,
    Mean,
    Median,
    Mode,
    Constant,
}

impl Strategy {
    fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "drop" => Ok(Strategy::Drop),
            "mean" => Ok(Strategy::Mean),
            "median" => Ok(Strategy::Median),
            "mode" => Ok(Strategy::Mode),
            "constant" => Ok(Strategy::Constant),
            other => Err(DomainError::invalid_parameter(
                "strategy",
                format!("unknown strategy '{other}' (drop, mean, median, mode, constant)"),
            )),
        }
    }
}

/// `{"strategy": "mean", "columns": ["age"], "fill_value": null}`
///
/// Without `columns` every column is targeted. Fill strategies skip columns
/// that do not exist; `drop` rejects them.
pub fn handle_missing(dataset: &Dataset, p: &Params) -> Result<Dataset, DomainError> {
    let strategy = Strategy::parse(params::required_str(p, "strategy")?)?;
    let targets =
        params::optional_string_list(p, "columns")?.unwrap_or_else(|| dataset.column_names());

    if strategy == Strategy::Drop {
        let mut keep = vec![true; dataset.num_rows()];
        for name in &targets {
            let missing = cell::missing_mask(dataset.column(name)?)?;
            for (k, m) in keep.iter_mut().zip(missing) {
                *k &= !m;
            }
        }
        return dataset.filter_rows(&keep);
    }

    let constant = match (strategy, p.get("fill_value")) {
        (Strategy::Constant, None | Some(Value::Null)) => {
            return Err(DomainError::invalid_parameter(
                "fill_value",
                "required for the 'constant' strategy",
            ));
        }
        (Strategy::Constant, Some(value)) => Some(value.clone()),
        _ => None,
    };

    let mut current = dataset.clone();
    for name in targets.iter().filter(|name| dataset.has_column(name)) {
        let array = dataset.column(name)?;
        let fill = match (&constant, strategy) {
            (Some(value), _) => Some(value.clone()),
            (None, Strategy::Mean | Strategy::Median) => {
                if !cell::is_numeric(array.data_type()) {
                    continue;
                }
                let values: Vec<f64> = cell::numeric_column(array)?
                    .into_iter()
                    .filter_map(|c| c.value())
                    .collect();
                let stat = if strategy == Strategy::Mean {
                    mean(&values)
                } else {
                    median(values)
                };
                match stat.and_then(serde_json::Number::from_f64) {
                    Some(number) => Some(Value::Number(number)),
                    None => mode(array)?,
                }
            }
            (None, _) => mode(array)?,
        };
        if let Some(fill) = fill {
            let filled = fill_column(array, &fill)?;
            current = current.replace_column(name, filled)?;
        }
    }
    Ok(current)
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Most frequent non-missing value; ties go to the smallest.
fn mode(array: &ArrayRef) -> Result<Option<Value>, DomainError> {
    let mut counts: HashMap<String, (usize, Value)> = HashMap::new();
    for value in cell::json_column(array)?.into_iter().filter(|v| !v.is_null()) {
        counts
            .entry(value.to_string())
            .or_insert((0, value))
            .0 += 1;
    }
    Ok(counts
        .into_values()
        .max_by(|(ca, va), (cb, vb)| ca.cmp(cb).then_with(|| compare_values(vb, va)))
        .map(|(_, value)| value))
}

fn integral_fill(fill: &Value) -> Option<i64> {
    match fill {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        _ => None,
    }
}

fn unsigned_fill(fill: &Value) -> Option<u64> {
    match fill {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        _ => None,
    }
}

/// Casts back to the column's own integer type, or keeps the 64-bit array
/// when a value does not fit it.
fn narrow_or_keep(filled: ArrayRef, data_type: &DataType) -> ArrayRef {
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    cast_with_options(filled.as_ref(), data_type, &options).unwrap_or(filled)
}

/// Replaces missing cells with `fill`. The column keeps its type when the
/// fill value fits it, otherwise it widens to float or string.
fn fill_column(array: &ArrayRef, fill: &Value) -> Result<ArrayRef, DomainError> {
    let missing = cell::missing_mask(array)?;
    if !missing.iter().any(|m| *m) {
        return Ok(array.clone());
    }
    let values = cell::json_column(array)?;
    let data_type = array.data_type();

    if cell::is_unsigned(data_type) {
        if let Some(fill) = unsigned_fill(fill) {
            let filled: UInt64Array = values
                .iter()
                .map(|v| if v.is_null() { Some(fill) } else { v.as_u64() })
                .collect();
            return Ok(narrow_or_keep(Arc::new(filled), data_type));
        }
    } else if cell::is_integer(data_type) {
        if let Some(fill) = integral_fill(fill) {
            let filled: Int64Array = values
                .iter()
                .map(|v| if v.is_null() { Some(fill) } else { v.as_i64() })
                .collect();
            return Ok(narrow_or_keep(Arc::new(filled), data_type));
        }
    }

    if cell::is_numeric(data_type) {
        if let Some(fill) = fill.as_f64() {
            let filled: Float64Array = values
                .iter()
                .map(|v| if v.is_null() { Some(fill) } else { v.as_f64() })
                .collect();
            let target = if cell::is_integer(data_type) {
                DataType::Float64
            } else {
                data_type.clone()
            };
            return Ok(cast(&filled, &target)?);
        }
    }

    if matches!(data_type, DataType::Boolean) {
        if let Some(fill) = fill.as_bool() {
            let filled: BooleanArray = values
                .iter()
                .map(|v| if v.is_null() { Some(fill) } else { v.as_bool() })
                .collect();
            return Ok(Arc::new(filled));
        }
    }

    let fill_text = match fill {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let display = cell::display_column(array)?;
    let filled: StringArray = display
        .into_iter()
        .zip(missing)
        .map(|(s, m)| Some(if m { fill_text.clone() } else { s }))
        .collect();
    Ok(Arc::new(filled))
}
