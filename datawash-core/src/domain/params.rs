// datawash-core/src/domain/params.rs

//! Typed accessors over the JSON parameter objects carried by steps and rules.

use serde_json::Value;

use crate::domain::error::DomainError;

/// Argument name -> JSON value, in insertion order.
pub type Params = serde_json::Map<String, Value>;

pub fn required_str<'a>(params: &'a Params, key: &str) -> Result<&'a str, DomainError> {
    match params.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(DomainError::invalid_parameter(
            key,
            format!("expected a string, got {other}"),
        )),
        None => Err(DomainError::invalid_parameter(key, "missing")),
    }
}

pub fn optional_str<'a>(params: &'a Params, key: &str) -> Result<Option<&'a str>, DomainError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => required_str(params, key).map(Some),
    }
}

/// Numbers are taken as-is, numeric strings are parsed.
pub fn required_f64(params: &Params, key: &str) -> Result<f64, DomainError> {
    let value = params
        .get(key)
        .ok_or_else(|| DomainError::invalid_parameter(key, "missing"))?;
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| DomainError::invalid_parameter(key, "number out of range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| DomainError::invalid_parameter(key, format!("'{s}' is not a number"))),
        other => Err(DomainError::invalid_parameter(
            key,
            format!("expected a number, got {other}"),
        )),
    }
}

pub fn string_list(params: &Params, key: &str) -> Result<Vec<String>, DomainError> {
    optional_string_list(params, key)?
        .ok_or_else(|| DomainError::invalid_parameter(key, "missing"))
}

pub fn optional_string_list(params: &Params, key: &str) -> Result<Option<Vec<String>>, DomainError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(DomainError::invalid_parameter(
                    key,
                    format!("expected a list of strings, found {other}"),
                )),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(DomainError::invalid_parameter(
            key,
            format!("expected a list, got {other}"),
        )),
    }
}

/// A missing key reads as an empty list.
pub fn value_list<'a>(params: &'a Params, key: &str) -> Result<&'a [Value], DomainError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(DomainError::invalid_parameter(
            key,
            format!("expected a list, got {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => Params::new(),
        }
    }

    #[test]
    fn test_required_str() {
        let p = params(json!({"column": "age", "n": 3}));
        assert_eq!(required_str(&p, "column").ok(), Some("age"));
        assert!(required_str(&p, "n").is_err());
        assert!(required_str(&p, "missing").is_err());
    }

    #[test]
    fn test_required_f64_accepts_numeric_strings() {
        let p = params(json!({"min": 0, "max": " 10.5 ", "bad": "ten"}));
        assert_eq!(required_f64(&p, "min").ok(), Some(0.0));
        assert_eq!(required_f64(&p, "max").ok(), Some(10.5));
        assert!(required_f64(&p, "bad").is_err());
    }

    #[test]
    fn test_string_lists() {
        let p = params(json!({"columns": ["a", "b"], "mixed": ["a", 1], "none": null}));
        assert_eq!(
            string_list(&p, "columns").ok(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert!(string_list(&p, "mixed").is_err());
        assert!(matches!(optional_string_list(&p, "none"), Ok(None)));
        assert!(string_list(&p, "none").is_err());
    }

    #[test]
    fn test_value_list_defaults_to_empty() {
        let p = params(json!({}));
        assert!(matches!(value_list(&p, "allowed"), Ok(items) if items.is_empty()));
    }
}
