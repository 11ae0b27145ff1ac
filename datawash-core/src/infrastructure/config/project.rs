// datawash-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::pipeline::OnError;
use crate::domain::project::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_CANDIDATES: [&str; 2] = ["datawash.yaml", "datawash.yml"];
pub const ENV_ON_ERROR: &str = "DATAWASH_ON_ERROR";
pub const ENV_REPORT_OUTPUT: &str = "DATAWASH_REPORT_OUTPUT";

/// Loads and validates `datawash.yaml` from `project_dir`, then applies
/// environment overrides. A missing file is an error.
#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project config");

    let content = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig = if content.trim().is_empty() {
        ProjectConfig::default()
    } else {
        serde_yaml::from_str(&content)?
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Like [`load_project_config`], but a missing file yields the defaults
/// (still subject to environment overrides).
pub fn load_or_default(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    match load_project_config(project_dir) {
        Err(InfrastructureError::ConfigNotFound(_)) => {
            info!("No project config found, using defaults");
            let mut config = ProjectConfig::default();
            apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
            config.validate()?;
            Ok(config)
        }
        other => other,
    }
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(
        root.join(CONFIG_CANDIDATES[0]).display().to_string(),
    ))
}

fn apply_env_overrides<F>(config: &mut ProjectConfig, lookup: F) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(ENV_ON_ERROR) {
        let on_error: OnError = val.parse().map_err(InfrastructureError::ConfigError)?;
        info!(old = %config.on_error, new = %on_error, "Overriding on_error via ENV");
        config.on_error = on_error;
    }
    if let Some(val) = lookup(ENV_REPORT_OUTPUT) {
        info!(old = ?config.report.output, new = ?val, "Overriding report output via ENV");
        config.report.output = val;
    }
    Ok(())
}
