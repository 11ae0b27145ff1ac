// datawash-core/src/application/transforms/columns.rs

use serde_json::Value;

use crate::domain::dataset::Dataset;
use crate::domain::error::DomainError;
use crate::domain::params::{self, Params};

/// `{"columns": ["a", "b"]}`
pub fn drop_columns(dataset: &Dataset, p: &Params) -> Result<Dataset, DomainError> {
    let columns = params::string_list(p, "columns")?;
    dataset.drop_columns(&columns)
}

/// `{"mapping": {"old": "new"}}`
pub fn rename_columns(dataset: &Dataset, p: &Params) -> Result<Dataset, DomainError> {
    let mapping = match p.get("mapping") {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(old, new)| match new {
                Value::String(new) => Ok((old.clone(), new.clone())),
                other => Err(DomainError::invalid_parameter(
                    "mapping",
                    format!("new name for '{old}' must be a string, got {other}"),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(DomainError::invalid_parameter(
                "mapping",
                format!("expected an object, got {other}"),
            ));
        }
        None => return Err(DomainError::invalid_parameter("mapping", "missing")),
    };
    dataset.rename_columns(&mapping)
}
