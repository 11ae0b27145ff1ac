// datawash-core/src/application/transforms/convert.rs

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use datafusion::arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray,
};
use datafusion::arrow::compute::cast;
use datafusion::arrow::datatypes::{DataType, TimeUnit};

use crate::domain::dataset::Dataset;
use crate::domain::dataset::cell::{self, Numeric};
use crate::domain::error::DomainError;
use crate::domain::params::{self, Params};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// `{"column": "age", "dtype": "int"}` with dtype one of
/// `str`, `string`, `int`, `float`, `bool`, `datetime`.
pub fn convert_type(dataset: &Dataset, p: &Params) -> Result<Dataset, DomainError> {
    let column = params::required_str(p, "column")?;
    let dtype = params::required_str(p, "dtype")?;
    let array = dataset.column(column)?;

    let converted = match dtype.trim().to_lowercase().as_str() {
        "str" | "string" => to_text(array)?,
        "int" => to_int(column, array)?,
        "float" => to_float(array)?,
        "bool" => to_bool(column, array)?,
        "datetime" => to_datetime(column, array)?,
        other => {
            return Err(DomainError::invalid_parameter(
                "dtype",
                format!("unsupported target type '{other}'"),
            ));
        }
    };
    dataset.replace_column(column, converted)
}

fn conversion(column: &str, reason: impl Into<String>) -> DomainError {
    DomainError::Conversion {
        column: column.to_string(),
        reason: reason.into(),
    }
}

fn to_text(array: &ArrayRef) -> Result<ArrayRef, DomainError> {
    let missing = cell::missing_mask(array)?;
    let values: Vec<Option<String>> = cell::display_column(array)?
        .into_iter()
        .zip(missing)
        .map(|(s, m)| (!m).then_some(s))
        .collect();
    Ok(Arc::new(StringArray::from(values)))
}

/// Unparsable values become null; fractional values are an error.
fn to_int(column: &str, array: &ArrayRef) -> Result<ArrayRef, DomainError> {
    if cell::is_integer(array.data_type()) {
        return Ok(cast(array.as_ref(), &DataType::Int64)?);
    }

    if let Some(strings) = array.as_any().downcast_ref::<StringArray>() {
        let mut values = Vec::with_capacity(strings.len());
        for raw in strings.iter() {
            let value = match raw {
                None => None,
                Some(s) => match s.trim().parse::<i64>() {
                    Ok(v) => Some(v),
                    Err(_) => cell::parse_number(s)
                        .map(|f| integral(column, f))
                        .transpose()?,
                },
            };
            values.push(value);
        }
        return Ok(Arc::new(Int64Array::from(values)));
    }

    let values = cell::numeric_column(array)?
        .into_iter()
        .map(|c| c.value().map(|f| integral(column, f)).transpose())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Arc::new(Int64Array::from(values)))
}

fn integral(column: &str, value: f64) -> Result<i64, DomainError> {
    if value.fract() != 0.0 || !value.is_finite() {
        return Err(conversion(
            column,
            format!("{value} cannot be represented as an integer"),
        ));
    }
    if value < i64::MIN as f64 || value > i64::MAX as f64 {
        return Err(conversion(column, format!("{value} is out of the int64 range")));
    }
    Ok(value as i64)
}

fn to_float(array: &ArrayRef) -> Result<ArrayRef, DomainError> {
    let values: Vec<Option<f64>> = cell::numeric_column(array)?
        .into_iter()
        .map(Numeric::value)
        .collect();
    Ok(Arc::new(Float64Array::from(values)))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn to_bool(column: &str, array: &ArrayRef) -> Result<ArrayRef, DomainError> {
    if matches!(array.data_type(), DataType::Boolean) {
        return Ok(array.clone());
    }

    if let Some(strings) = array.as_any().downcast_ref::<StringArray>() {
        let values = strings
            .iter()
            .map(|raw| match raw {
                None => Ok(None),
                Some(s) => parse_bool(s)
                    .map(Some)
                    .ok_or_else(|| conversion(column, format!("'{s}' is not a boolean"))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Arc::new(BooleanArray::from(values)));
    }

    if cell::is_numeric(array.data_type()) {
        let values = cell::numeric_column(array)?
            .into_iter()
            .map(|c| match c {
                Numeric::Value(v) if v == 1.0 => Ok(Some(true)),
                Numeric::Value(v) if v == 0.0 => Ok(Some(false)),
                Numeric::Value(v) => Err(conversion(column, format!("{v} is not a boolean"))),
                _ => Ok(None),
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Arc::new(BooleanArray::from(values)));
    }

    Err(conversion(
        column,
        format!("cannot convert {} to bool", cell::dtype_name(array.data_type())),
    ))
}

fn parse_datetime(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).timestamp_micros());
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().timestamp_micros());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc().timestamp_micros());
        }
    }
    None
}

/// ISO-like strings are parsed, anything unparsable becomes null.
fn to_datetime(column: &str, array: &ArrayRef) -> Result<ArrayRef, DomainError> {
    let target = DataType::Timestamp(TimeUnit::Microsecond, None);
    match array.data_type() {
        DataType::Timestamp(_, _) | DataType::Date32 | DataType::Date64 => {
            Ok(cast(array.as_ref(), &target)?)
        }
        DataType::Utf8 => {
            let strings = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| conversion(column, "string column has an unexpected layout"))?;
            let values: Vec<Option<i64>> = strings
                .iter()
                .map(|raw| raw.and_then(parse_datetime))
                .collect();
            Ok(Arc::new(TimestampMicrosecondArray::from(values)))
        }
        DataType::Null => Ok(Arc::new(TimestampMicrosecondArray::from(vec![
            None::<i64>;
            array.len()
        ]))),
        other => Err(conversion(
            column,
            format!("cannot convert {} to datetime", cell::dtype_name(other)),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn dataset(values: Vec<Option<&str>>) -> Dataset {
        Dataset::from_columns([("v", Arc::new(StringArray::from(values)) as ArrayRef)]).unwrap()
    }

    fn convert(ds: &Dataset, dtype: &str) -> Result<Dataset, DomainError> {
        let p = json!({"column": "v", "dtype": dtype});
        convert_type(ds, p.as_object().unwrap())
    }

    fn values(ds: &Dataset) -> Vec<Value> {
        cell::json_column(ds.column("v").unwrap()).unwrap()
    }

    #[test]
    fn test_int_coerces_garbage_to_null() -> anyhow::Result<()> {
        let out = convert(&dataset(vec![Some("1"), Some(" 2 "), Some("x"), None, Some("3.0")]), "int")?;
        assert_eq!(out.dtype_name("v")?, "int64");
        assert_eq!(values(&out), vec![json!(1), json!(2), Value::Null, Value::Null, json!(3)]);
        Ok(())
    }

    #[test]
    fn test_int_rejects_fractions() {
        let err = convert(&dataset(vec![Some("1.5")]), "int");
        assert!(matches!(err, Err(DomainError::Conversion { .. })));
    }

    #[test]
    fn test_float_and_back_to_string() -> anyhow::Result<()> {
        let floats = convert(&dataset(vec![Some("1.5"), Some("nope")]), "float")?;
        assert_eq!(floats.dtype_name("v")?, "float64");
        assert_eq!(values(&floats), vec![json!(1.5), Value::Null]);

        let strings = convert(&floats, "str")?;
        assert_eq!(strings.dtype_name("v")?, "string");
        assert_eq!(values(&strings), vec![json!("1.5"), Value::Null]);
        Ok(())
    }

    #[test]
    fn test_bool() -> anyhow::Result<()> {
        let out = convert(&dataset(vec![Some("Yes"), Some("0"), None, Some("FALSE")]), "bool")?;
        assert_eq!(values(&out), vec![json!(true), json!(false), Value::Null, json!(false)]);
        assert!(convert(&dataset(vec![Some("maybe")]), "bool").is_err());
        Ok(())
    }

    #[test]
    fn test_datetime() -> anyhow::Result<()> {
        let out = convert(
            &dataset(vec![Some("2024-01-31"), Some("2024-01-31T10:00:00Z"), Some("soon")]),
            "datetime",
        )?;
        assert_eq!(out.dtype_name("v")?, "datetime");
        let column = out.column("v")?;
        assert!(!column.is_null(0));
        assert!(!column.is_null(1));
        assert!(column.is_null(2));
        Ok(())
    }

    #[test]
    fn test_unknown_target_type() {
        assert!(matches!(
            convert(&dataset(vec![Some("1")]), "complex"),
            Err(DomainError::InvalidParameter { .. })
        ));
    }
}
