pub mod documents;
pub mod project;

pub use crate::domain::project::ProjectConfig;
pub use documents::{load_pipeline_file, load_rules_file, save_pipeline_file, save_rules_file};
pub use project::{load_or_default, load_project_config};
