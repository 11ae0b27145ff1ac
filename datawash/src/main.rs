// datawash/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, PipelineAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug datawash apply ... to see the details
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project_dir = cli.project_dir;

    let result = match cli.command {
        Commands::Inspect { data, limit } => commands::inspect::execute(data, limit).await,
        Commands::Apply {
            data,
            pipeline,
            output,
            strict,
        } => commands::apply::execute(project_dir, data, pipeline, output, strict).await,
        Commands::Check {
            data,
            rules,
            pipeline,
            report,
            fail_on_violation,
        } => {
            commands::check::execute(
                project_dir,
                commands::check::CheckArgs {
                    data,
                    rules,
                    pipeline,
                    report,
                    fail_on_violation,
                },
            )
            .await
        }
        Commands::Pipeline { action } => match action {
            PipelineAction::Init { file, force } => commands::pipeline::init(file, force),
            PipelineAction::Add {
                file,
                op,
                params,
                label,
            } => commands::pipeline::add(file, op, params, label),
            PipelineAction::Undo { file } => commands::pipeline::undo(file),
            PipelineAction::Show { file } => commands::pipeline::show(file),
        },
        Commands::Ops => commands::ops::execute(),
    };

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
