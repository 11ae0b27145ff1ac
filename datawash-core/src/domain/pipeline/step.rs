// datawash-core/src/domain/pipeline/step.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire;
use crate::domain::params::Params;

/// One recorded operation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(rename = "op")]
    operation: String,
    #[serde(rename = "params", default, deserialize_with = "wire::params_or_empty")]
    parameters: Params,
    #[serde(rename = "ts", default = "Utc::now", deserialize_with = "wire::timestamp_or_now")]
    timestamp: DateTime<Utc>,
    #[serde(default)]
    label: Option<String>,
}

impl Step {
    pub fn new(
        operation: impl Into<String>,
        parameters: Params,
        label: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            operation: operation.into(),
            parameters,
            timestamp,
            label,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn parameters(&self) -> &Params {
        &self.parameters
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_names_and_defaults() -> anyhow::Result<()> {
        let step: Step = serde_json::from_value(json!({"op": "drop_columns"}))?;
        assert_eq!(step.operation(), "drop_columns");
        assert!(step.parameters().is_empty());
        assert_eq!(step.label(), None);

        let value = serde_json::to_value(&step)?;
        assert!(value.get("op").is_some());
        assert!(value.get("ts").is_some());
        assert!(value.get("params").is_some());
        assert!(value.get("label").is_some());
        Ok(())
    }

    #[test]
    fn test_null_params_and_ts_take_defaults() -> anyhow::Result<()> {
        let before = Utc::now();
        let step: Step =
            serde_json::from_value(json!({"op": "drop_columns", "params": null, "ts": null}))?;
        assert!(step.parameters().is_empty());
        assert!(step.timestamp() >= before);
        Ok(())
    }

    #[test]
    fn test_naive_timestamp_is_read_as_utc() -> anyhow::Result<()> {
        let step: Step = serde_json::from_value(json!({
            "op": "drop_columns",
            "ts": "2024-05-01T12:00:00.123456"
        }))?;
        assert_eq!(step.timestamp().to_rfc3339(), "2024-05-01T12:00:00.123456+00:00");
        Ok(())
    }

    #[test]
    fn test_bad_params_and_ts_are_rejected() {
        assert!(serde_json::from_value::<Step>(json!({"op": "x", "params": [1]})).is_err());
        assert!(serde_json::from_value::<Step>(json!({"op": "x", "ts": "soon"})).is_err());
    }

    #[test]
    fn test_missing_op_is_rejected() {
        assert!(serde_json::from_value::<Step>(json!({"params": {}})).is_err());
    }
}
