// datawash-core/src/domain/project.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::pipeline::OnError;

/// Contents of `datawash.yaml`. Every field has a default, so an absent
/// file and an empty file mean the same thing.
#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct ProjectConfig {
    #[serde(default = "default_name")]
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,

    #[serde(default)]
    pub on_error: OnError,

    #[validate(nested)]
    #[serde(default)]
    pub quality: QualitySettings,

    #[validate(nested)]
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct QualitySettings {
    /// Failing row ids kept per rule result.
    #[serde(default = "default_failed_row_sample")]
    #[validate(range(min = 1, message = "failed_row_sample must be at least 1"))]
    pub failed_row_sample: usize,

    /// Failing rows shown in the HTML report.
    #[serde(default = "default_report_sample_rows")]
    #[validate(range(min = 1, message = "report_sample_rows must be at least 1"))]
    pub report_sample_rows: usize,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct ReportSettings {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_output")]
    #[validate(length(min = 1, message = "Report output path cannot be empty"))]
    pub output: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            on_error: OnError::default(),
            quality: QualitySettings::default(),
            report: ReportSettings::default(),
        }
    }
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            failed_row_sample: default_failed_row_sample(),
            report_sample_rows: default_report_sample_rows(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            output: default_output(),
        }
    }
}

fn default_name() -> String {
    "datawash".to_string()
}
fn default_failed_row_sample() -> usize {
    100
}
fn default_report_sample_rows() -> usize {
    50
}
fn default_title() -> String {
    "Data Quality Report".to_string()
}
fn default_output() -> String {
    "target/quality_report.html".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() -> anyhow::Result<()> {
        let config: ProjectConfig = serde_yaml::from_str("{}")?;
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.quality.failed_row_sample, 100);
        assert_eq!(config.report.output, "target/quality_report.html");
        Ok(())
    }

    #[test]
    fn test_zero_sample_is_invalid() -> anyhow::Result<()> {
        let config: ProjectConfig =
            serde_yaml::from_str("quality:\n  failed_row_sample: 0\n")?;
        assert!(config.validate().is_err());
        Ok(())
    }
}
