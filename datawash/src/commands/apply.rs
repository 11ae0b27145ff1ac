// datawash/src/commands/apply.rs

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use datawash_core::infrastructure::adapters::DataFusionAdapter;
use datawash_core::infrastructure::config::load_or_default;
use datawash_core::ports::source::DatasetSink;
use datawash_core::{OnError, Session};

use super::{print_rows, read_dataset, registry};

const PREVIEW_ROWS: usize = 5;

pub async fn execute(
    project_dir: PathBuf,
    data: PathBuf,
    pipeline: PathBuf,
    output: Option<PathBuf>,
    strict: bool,
) -> Result<()> {
    let config = load_or_default(&project_dir)?;
    let on_error = if strict { OnError::Raise } else { config.on_error };

    println!(
        "🧽 Applying '{}' to '{}' (on_error: {})",
        pipeline.display(),
        data.display(),
        on_error
    );

    let dataset = read_dataset(&data).await?;
    let document = fs::read_to_string(&pipeline)
        .with_context(|| format!("Failed to read pipeline '{}'", pipeline.display()))?;

    let mut session = Session::new(dataset, registry()).with_on_error(on_error);
    let skipped = session.load_pipeline(&document)?;

    for skip in &skipped {
        println!(
            "⚠️  Skipped step {} ({}): {}",
            skip.index, skip.operation, skip.reason
        );
    }

    let current = session.current();
    println!(
        "✅ {} steps applied: {} → {} rows, {} → {} columns",
        session.pipeline().len() - skipped.len(),
        session.original().num_rows(),
        current.num_rows(),
        session.original().num_columns(),
        current.num_columns()
    );

    match output {
        Some(path) => {
            DataFusionAdapter::new().write(current, &path).await?;
            info!(path = %path.display(), "Cleaned dataset written");
            println!("💾 Written to '{}'", path.display());
        }
        None => print_rows(current, PREVIEW_ROWS)?,
    }

    Ok(())
}
