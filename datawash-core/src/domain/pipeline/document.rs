// datawash-core/src/domain/pipeline/document.rs

//! Portable JSON form of a pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::step::Step;
use super::wire;

pub const DEFAULT_VERSION: &str = "1.0";

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

/// Accepts `"1.0"` as well as `1.0` or `2`.
fn version_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(default_version()),
        other => Err(serde::de::Error::custom(format!(
            "version must be a string or a number, got {other}"
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub exported_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDocument {
    #[serde(default = "default_version", deserialize_with = "version_string")]
    pub version: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub meta: DocumentMeta,
}

impl Default for PipelineDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            steps: Vec::new(),
            meta: DocumentMeta::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_sparse_document() -> anyhow::Result<()> {
        let doc: PipelineDocument = serde_json::from_value(json!({}))?;
        assert_eq!(doc.version, "1.0");
        assert!(doc.steps.is_empty());
        assert_eq!(doc.meta.exported_at, None);
        Ok(())
    }

    #[test]
    fn test_numeric_version_is_stringified() -> anyhow::Result<()> {
        let doc: PipelineDocument = serde_json::from_value(json!({"version": 2, "steps": []}))?;
        assert_eq!(doc.version, "2");
        Ok(())
    }

    #[test]
    fn test_naive_exported_at_is_accepted() -> anyhow::Result<()> {
        let doc: PipelineDocument = serde_json::from_value(json!({
            "steps": [],
            "meta": {"exported_at": "2024-05-01T12:00:00.5"}
        }))?;
        let exported = doc.meta.exported_at.map(|ts| ts.to_rfc3339());
        assert_eq!(exported.as_deref(), Some("2024-05-01T12:00:00.500+00:00"));

        let doc: PipelineDocument = serde_json::from_value(json!({"meta": {"exported_at": null}}))?;
        assert_eq!(doc.meta.exported_at, None);
        Ok(())
    }

    #[test]
    fn test_steps_must_be_a_list() {
        assert!(serde_json::from_value::<PipelineDocument>(json!({"steps": {"op": "x"}})).is_err());
    }
}
