// datawash/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datawash")]
#[command(about = "Replayable dataset cleaning pipelines and data quality checks", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding datawash.yaml
    #[arg(long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🔍 Shows shape, column profile and sample rows of a data file
    Inspect {
        /// CSV, newline-delimited JSON or Parquet file
        data: PathBuf,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// 🧽 Replays a pipeline document on a data file
    Apply {
        data: PathBuf,

        /// Pipeline document (JSON)
        #[arg(long, short)]
        pipeline: PathBuf,

        /// Where to write the cleaned dataset (format from the extension)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Abort on the first unknown or failing step
        #[arg(long)]
        strict: bool,
    },

    /// 🧪 Runs quality rules and writes the HTML report
    Check {
        data: PathBuf,

        /// Rule list (JSON array, or YAML)
        #[arg(long, short)]
        rules: PathBuf,

        /// Clean the data with this pipeline before checking
        #[arg(long, short)]
        pipeline: Option<PathBuf>,

        /// Report path (defaults to report.output from datawash.yaml)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Exit with an error when any rule fails
        #[arg(long)]
        fail_on_violation: bool,
    },

    /// 📝 Edits pipeline documents
    Pipeline {
        #[command(subcommand)]
        action: PipelineAction,
    },

    /// 📚 Lists the registered operations
    Ops,
}

#[derive(Subcommand)]
pub enum PipelineAction {
    /// Creates an empty pipeline document
    Init {
        file: PathBuf,

        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },

    /// Appends a step
    Add {
        file: PathBuf,

        /// Operation name (see `datawash ops`)
        op: String,

        /// Step parameters as a JSON object
        #[arg(long, default_value = "{}")]
        params: String,

        #[arg(long)]
        label: Option<String>,
    },

    /// Removes the last step
    Undo { file: PathBuf },

    /// Prints the steps
    Show { file: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_inspect_defaults() -> Result<()> {
        let args = Cli::parse_from(["datawash", "inspect", "data.csv"]);
        assert_eq!(args.project_dir.to_string_lossy(), ".");
        match args.command {
            Commands::Inspect { data, limit } => {
                assert_eq!(data.to_string_lossy(), "data.csv");
                assert_eq!(limit, 5);
                Ok(())
            }
            _ => bail!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_cli_parse_apply_strict() -> Result<()> {
        let args = Cli::parse_from([
            "datawash",
            "apply",
            "data.csv",
            "--pipeline",
            "p.json",
            "--strict",
            "--project-dir",
            "/tmp",
        ]);
        assert_eq!(args.project_dir.to_string_lossy(), "/tmp");
        match args.command {
            Commands::Apply {
                pipeline,
                output,
                strict,
                ..
            } => {
                assert_eq!(pipeline.to_string_lossy(), "p.json");
                assert_eq!(output, None);
                assert!(strict);
                Ok(())
            }
            _ => bail!("Expected Apply command"),
        }
    }

    #[test]
    fn test_cli_parse_check() -> Result<()> {
        let args = Cli::parse_from([
            "datawash",
            "check",
            "data.csv",
            "-r",
            "rules.json",
            "--fail-on-violation",
        ]);
        match args.command {
            Commands::Check {
                rules,
                pipeline,
                report,
                fail_on_violation,
                ..
            } => {
                assert_eq!(rules.to_string_lossy(), "rules.json");
                assert_eq!(pipeline, None);
                assert_eq!(report, None);
                assert!(fail_on_violation);
                Ok(())
            }
            _ => bail!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_parse_pipeline_add() -> Result<()> {
        let args = Cli::parse_from([
            "datawash",
            "pipeline",
            "add",
            "p.json",
            "drop_columns",
            "--params",
            r#"{"columns": ["a"]}"#,
        ]);
        match args.command {
            Commands::Pipeline {
                action: PipelineAction::Add { op, params, label, .. },
            } => {
                assert_eq!(op, "drop_columns");
                assert_eq!(params, r#"{"columns": ["a"]}"#);
                assert_eq!(label, None);
                Ok(())
            }
            _ => bail!("Expected Pipeline Add command"),
        }
    }
}
