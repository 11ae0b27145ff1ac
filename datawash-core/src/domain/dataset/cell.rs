// datawash-core/src/domain/dataset/cell.rs

//! Per-cell views over Arrow columns: JSON values, numeric coercion,
//! display strings and canonical dtype names.

use datafusion::arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, UInt64Array,
};
use datafusion::arrow::compute::cast;
use datafusion::arrow::datatypes::DataType;
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::arrow::util::display::{ArrayFormatter, FormatOptions};
use serde_json::{Number, Value};

use crate::domain::error::DomainError;

/// Numeric coercion of a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Value(f64),
    Missing,
    NonNumeric,
}

impl Numeric {
    pub fn value(self) -> Option<f64> {
        match self {
            Numeric::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Canonical, lowercase name of an Arrow type.
pub fn dtype_name(data_type: &DataType) -> String {
    match data_type {
        DataType::Null => "null".to_string(),
        DataType::Boolean => "bool".to_string(),
        DataType::Int8 => "int8".to_string(),
        DataType::Int16 => "int16".to_string(),
        DataType::Int32 => "int32".to_string(),
        DataType::Int64 => "int64".to_string(),
        DataType::UInt8 => "uint8".to_string(),
        DataType::UInt16 => "uint16".to_string(),
        DataType::UInt32 => "uint32".to_string(),
        DataType::UInt64 => "uint64".to_string(),
        DataType::Float16 => "float16".to_string(),
        DataType::Float32 => "float32".to_string(),
        DataType::Float64 => "float64".to_string(),
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => "string".to_string(),
        DataType::Date32 | DataType::Date64 => "date".to_string(),
        DataType::Timestamp(_, _) => "datetime".to_string(),
        other => other.to_string().to_lowercase(),
    }
}

fn is_float(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Float16 | DataType::Float32 | DataType::Float64
    )
}

fn is_signed(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
    )
}

pub fn is_unsigned(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64
    )
}

fn is_decimal(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Decimal128(_, _) | DataType::Decimal256(_, _)
    )
}

pub fn is_numeric(data_type: &DataType) -> bool {
    is_float(data_type) || is_decimal(data_type) || is_signed(data_type) || is_unsigned(data_type)
}

pub fn is_integer(data_type: &DataType) -> bool {
    is_signed(data_type) || is_unsigned(data_type)
}

fn float_values(array: &ArrayRef) -> Result<Vec<Option<f64>>, DomainError> {
    let casted = cast(array.as_ref(), &DataType::Float64)?;
    let floats = casted
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| DomainError::InvalidDataset("float cast produced no Float64Array".into()))?;
    Ok(floats.iter().collect())
}

/// A cell is missing when it is null or a floating point NaN.
pub fn missing_mask(array: &ArrayRef) -> Result<Vec<bool>, DomainError> {
    if is_float(array.data_type()) {
        return Ok(float_values(array)?
            .into_iter()
            .map(|v| v.is_none_or(f64::is_nan))
            .collect());
    }
    Ok((0..array.len()).map(|i| array.is_null(i)).collect())
}

/// JSON view of a column. Missing cells become `Value::Null`.
pub fn json_column(array: &ArrayRef) -> Result<Vec<Value>, DomainError> {
    let data_type = array.data_type();

    if matches!(data_type, DataType::Null) {
        return Ok(vec![Value::Null; array.len()]);
    }

    if let Some(bools) = array.as_any().downcast_ref::<BooleanArray>() {
        return Ok(bools
            .iter()
            .map(|v| v.map(Value::Bool).unwrap_or(Value::Null))
            .collect());
    }

    if is_signed(data_type) {
        let casted = cast(array.as_ref(), &DataType::Int64)?;
        if let Some(ints) = casted.as_any().downcast_ref::<Int64Array>() {
            return Ok(ints
                .iter()
                .map(|v| v.map(Value::from).unwrap_or(Value::Null))
                .collect());
        }
    }

    if is_unsigned(data_type) {
        let casted = cast(array.as_ref(), &DataType::UInt64)?;
        if let Some(ints) = casted.as_any().downcast_ref::<UInt64Array>() {
            return Ok(ints
                .iter()
                .map(|v| v.map(Value::from).unwrap_or(Value::Null))
                .collect());
        }
    }

    if is_float(data_type) || is_decimal(data_type) {
        return Ok(float_values(array)?
            .into_iter()
            .map(|v| v.and_then(Number::from_f64).map(Value::Number).unwrap_or(Value::Null))
            .collect());
    }

    if matches!(
        data_type,
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
    ) {
        let casted = cast(array.as_ref(), &DataType::Utf8)?;
        if let Some(strings) = casted.as_any().downcast_ref::<StringArray>() {
            return Ok(strings
                .iter()
                .map(|v| v.map(|s| Value::String(s.to_string())).unwrap_or(Value::Null))
                .collect());
        }
    }

    // Dates, timestamps and anything exotic are carried as their display form.
    let display = display_column(array)?;
    Ok(display
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            if array.is_null(i) {
                Value::Null
            } else {
                Value::String(s)
            }
        })
        .collect())
}

/// Numeric coercion: numbers as-is, booleans as 0/1, strings parsed after trimming.
pub fn numeric_column(array: &ArrayRef) -> Result<Vec<Numeric>, DomainError> {
    let data_type = array.data_type();

    if is_numeric(data_type) {
        return Ok(float_values(array)?
            .into_iter()
            .map(|v| match v {
                Some(f) if !f.is_nan() => Numeric::Value(f),
                _ => Numeric::Missing,
            })
            .collect());
    }

    if let Some(bools) = array.as_any().downcast_ref::<BooleanArray>() {
        return Ok(bools
            .iter()
            .map(|v| match v {
                Some(true) => Numeric::Value(1.0),
                Some(false) => Numeric::Value(0.0),
                None => Numeric::Missing,
            })
            .collect());
    }

    if matches!(
        data_type,
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
    ) {
        let casted = cast(array.as_ref(), &DataType::Utf8)?;
        if let Some(strings) = casted.as_any().downcast_ref::<StringArray>() {
            return Ok(strings
                .iter()
                .map(|v| match v {
                    None => Numeric::Missing,
                    Some(s) => parse_number(s).map_or(Numeric::NonNumeric, Numeric::Value),
                })
                .collect());
        }
    }

    Ok((0..array.len())
        .map(|i| {
            if array.is_null(i) {
                Numeric::Missing
            } else {
                Numeric::NonNumeric
            }
        })
        .collect())
}

/// Trimmed float parse; NaN spellings do not count as numbers.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Display strings for every cell; nulls render as the empty string.
pub fn display_column(array: &ArrayRef) -> Result<Vec<String>, DomainError> {
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
    Ok((0..array.len())
        .map(|i| formatter.value(i).to_string())
        .collect())
}

/// String views of large or view-backed text columns are folded to `Utf8`
/// so every later kernel sees a single string layout.
pub fn normalize_batch(batch: RecordBatch) -> Result<RecordBatch, DomainError> {
    let needs_cast = batch
        .schema()
        .fields()
        .iter()
        .any(|f| matches!(f.data_type(), DataType::LargeUtf8 | DataType::Utf8View));
    if !needs_cast {
        return Ok(batch);
    }

    let mut columns = Vec::with_capacity(batch.num_columns());
    for (field, column) in batch.schema().fields().iter().zip(batch.columns()) {
        let column = match field.data_type() {
            DataType::LargeUtf8 | DataType::Utf8View => cast(column.as_ref(), &DataType::Utf8)?,
            _ => column.clone(),
        };
        columns.push((field.name().clone(), column));
    }
    super::build_batch(columns, batch.num_rows())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use datafusion::arrow::array::{Float64Array, Int32Array, StringArray};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_dtype_names() {
        assert_eq!(dtype_name(&DataType::Int32), "int32");
        assert_eq!(dtype_name(&DataType::Utf8View), "string");
        assert_eq!(dtype_name(&DataType::Boolean), "bool");
        assert_eq!(
            dtype_name(&DataType::Timestamp(
                datafusion::arrow::datatypes::TimeUnit::Microsecond,
                None
            )),
            "datetime"
        );
    }

    #[test]
    fn test_missing_includes_nan() -> anyhow::Result<()> {
        let array: ArrayRef = Arc::new(Float64Array::from(vec![Some(1.0), None, Some(f64::NAN)]));
        assert_eq!(missing_mask(&array)?, vec![false, true, true]);
        assert_eq!(json_column(&array)?, vec![json!(1.0), Value::Null, Value::Null]);
        Ok(())
    }

    #[test]
    fn test_decimals_are_numeric() -> anyhow::Result<()> {
        let decimals = datafusion::arrow::array::Decimal128Array::from(vec![
            Some(500),
            Some(1525),
            None,
        ])
        .with_precision_and_scale(10, 2)?;
        let array: ArrayRef = Arc::new(decimals);
        assert!(is_numeric(array.data_type()));
        assert_eq!(
            numeric_column(&array)?,
            vec![Numeric::Value(5.0), Numeric::Value(15.25), Numeric::Missing]
        );
        assert_eq!(json_column(&array)?, vec![json!(5.0), json!(15.25), Value::Null]);
        Ok(())
    }

    #[test]
    fn test_numeric_coercion_of_strings() -> anyhow::Result<()> {
        let array: ArrayRef = Arc::new(StringArray::from(vec![
            Some(" 5 "),
            Some("abc"),
            None,
            Some("-1.5"),
        ]));
        assert_eq!(
            numeric_column(&array)?,
            vec![
                Numeric::Value(5.0),
                Numeric::NonNumeric,
                Numeric::Missing,
                Numeric::Value(-1.5)
            ]
        );
        Ok(())
    }

    #[test]
    fn test_json_and_display_of_integers() -> anyhow::Result<()> {
        let array: ArrayRef = Arc::new(Int32Array::from(vec![Some(7), None]));
        assert_eq!(json_column(&array)?, vec![json!(7), Value::Null]);
        assert_eq!(display_column(&array)?, vec!["7".to_string(), String::new()]);
        Ok(())
    }
}
