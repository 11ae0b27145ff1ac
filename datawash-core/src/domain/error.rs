// datawash-core/src/domain/error.rs

use datafusion::arrow::error::ArrowError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Column '{0}' not found in dataset")]
    #[diagnostic(
        code(datawash::domain::column_not_found),
        help("Check the column name against `datawash inspect`.")
    )]
    ColumnNotFound(String),

    #[error("Invalid parameter '{name}': {reason}")]
    #[diagnostic(code(datawash::domain::parameter))]
    InvalidParameter { name: String, reason: String },

    #[error("Conversion failed for column '{column}': {reason}")]
    #[diagnostic(code(datawash::domain::conversion))]
    Conversion { column: String, reason: String },

    #[error("Unknown pipeline operation '{operation}' at step {index}")]
    #[diagnostic(
        code(datawash::domain::unknown_operation),
        help("Run `datawash ops` to list the registered operations.")
    )]
    UnknownOperation { index: usize, operation: String },

    #[error("Step {index} ('{operation}') failed: {source}")]
    #[diagnostic(code(datawash::domain::step_failed))]
    StepFailed {
        index: usize,
        operation: String,
        #[source]
        source: Box<DomainError>,
    },

    #[error("Malformed document: {0}")]
    #[diagnostic(
        code(datawash::domain::document),
        help("Pipeline documents need a 'steps' list whose items carry an 'op' string.")
    )]
    Document(String),

    #[error("Invalid dataset: {0}")]
    #[diagnostic(code(datawash::domain::dataset))]
    InvalidDataset(String),

    #[error("Arrow Error: {0}")]
    #[diagnostic(code(datawash::domain::arrow))]
    Arrow(#[from] ArrowError),
}

impl DomainError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        DomainError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
