// datawash-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum EngineError {
    #[error("DataFusion Engine Error: {0}")]
    #[diagnostic(
        code(datawash::infra::engine::datafusion),
        help("An error occurred while reading or writing a data file.")
    )]
    DataFusion(#[from] datafusion::error::DataFusionError),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATA ENGINE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(datawash::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(datawash::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(datawash::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(datawash::infra::config_invalid))]
    ConfigInvalid(#[from] validator::ValidationErrors),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(datawash::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Unsupported data file '{0}'")]
    #[diagnostic(
        code(datawash::infra::format),
        help("Supported extensions: .csv, .json (newline-delimited), .parquet")
    )]
    UnsupportedFormat(String),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(
        code(datawash::infra::template),
        help("Check the Jinja syntax of the report template.")
    )]
    TemplateError(#[from] minijinja::Error),
}

impl From<datafusion::error::DataFusionError> for InfrastructureError {
    fn from(err: datafusion::error::DataFusionError) -> Self {
        InfrastructureError::Engine(EngineError::DataFusion(err))
    }
}
