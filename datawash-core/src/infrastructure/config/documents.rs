// datawash-core/src/infrastructure/config/documents.rs

//! Pipeline and rule documents on disk.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::pipeline::Pipeline;
use crate::application::registry::TransformRegistry;
use crate::domain::error::DomainError;
use crate::domain::quality::Rule;
use crate::error::DatawashError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

#[instrument(skip(registry))]
pub fn load_pipeline_file(
    path: &Path,
    registry: Arc<TransformRegistry>,
) -> Result<Pipeline, DatawashError> {
    let content = fs::read_to_string(path).map_err(InfrastructureError::Io)?;
    let pipeline = Pipeline::from_json(&content, registry)?;
    debug!(steps = pipeline.len(), "Pipeline document loaded");
    Ok(pipeline)
}

pub fn save_pipeline_file(path: &Path, pipeline: &Pipeline) -> Result<(), DatawashError> {
    let json = pipeline.to_json()?;
    atomic_write(path, json + "\n")?;
    Ok(())
}

/// Reads a rule list. JSON by default, YAML for `.yaml` / `.yml` files.
#[instrument]
pub fn load_rules_file(path: &Path) -> Result<Vec<Rule>, DatawashError> {
    let content = fs::read_to_string(path).map_err(InfrastructureError::Io)?;
    let rules: Vec<Rule> = if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|e| DomainError::Document(e.to_string()))?
    } else {
        serde_json::from_str(&content).map_err(|e| DomainError::Document(e.to_string()))?
    };
    debug!(rules = rules.len(), "Rule document loaded");
    Ok(rules)
}

pub fn save_rules_file(path: &Path, rules: &[Rule]) -> Result<(), DatawashError> {
    let json = serde_json::to_string_pretty(rules).map_err(InfrastructureError::JsonError)?;
    atomic_write(path, json + "\n")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_pipeline_file_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("pipeline.json");
        let registry = Arc::new(TransformRegistry::with_builtins());

        let mut pipeline = Pipeline::new(registry.clone());
        pipeline.add_step(
            "drop_columns",
            json!({"columns": ["a"]}).as_object().cloned().unwrap(),
            None,
        );
        save_pipeline_file(&path, &pipeline)?;

        let loaded = load_pipeline_file(&path, registry)?;
        assert_eq!(loaded.steps(), pipeline.steps());
        Ok(())
    }

    #[test]
    fn test_rules_in_json_and_yaml() -> Result<()> {
        let dir = tempdir()?;
        let json_path = dir.path().join("rules.json");
        fs::write(
            &json_path,
            r#"[{"type": "not_null", "params": {"column": "id"}}]"#,
        )?;
        let yaml_path = dir.path().join("rules.yaml");
        fs::write(
            &yaml_path,
            "- type: between\n  params:\n    column: age\n    min: 0\n    max: 120\n",
        )?;

        assert_eq!(load_rules_file(&json_path)?[0].rule_type, "not_null");
        let yaml_rules = load_rules_file(&yaml_path)?;
        assert_eq!(yaml_rules[0].params.get("max"), Some(&json!(120)));

        let out = dir.path().join("copy.json");
        save_rules_file(&out, &yaml_rules)?;
        assert_eq!(load_rules_file(&out)?, yaml_rules);
        Ok(())
    }

    #[test]
    fn test_malformed_rules_are_document_errors() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("rules.json");
        fs::write(&path, r#"{"type": "not_null"}"#)?;
        assert!(matches!(
            load_rules_file(&path),
            Err(DatawashError::Domain(DomainError::Document(_)))
        ));
        Ok(())
    }
}
