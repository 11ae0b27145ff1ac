// datawash/src/commands/check.rs

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::{Cell, Color};

use datawash_core::application::ReportMetadata;
use datawash_core::infrastructure::config::{load_or_default, load_rules_file};
use datawash_core::infrastructure::fs::atomic_write;
use datawash_core::infrastructure::template::JinjaRenderer;
use datawash_core::{ReportGenerator, Session};

use super::{new_table, read_dataset, registry};

pub struct CheckArgs {
    pub data: PathBuf,
    pub rules: PathBuf,
    pub pipeline: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub fail_on_violation: bool,
}

pub async fn execute(project_dir: PathBuf, args: CheckArgs) -> Result<()> {
    let config = load_or_default(&project_dir)?;
    let dataset = read_dataset(&args.data).await?;

    let mut session = Session::new(dataset, registry())
        .with_on_error(config.on_error)
        .with_failed_row_sample(config.quality.failed_row_sample);

    if let Some(pipeline) = &args.pipeline {
        let document = fs::read_to_string(pipeline)
            .with_context(|| format!("Failed to read pipeline '{}'", pipeline.display()))?;
        let skipped = session.load_pipeline(&document)?;
        for skip in &skipped {
            println!(
                "⚠️  Skipped step {} ({}): {}",
                skip.index, skip.operation, skip.reason
            );
        }
    }

    session.set_rules(load_rules_file(&args.rules)?);
    println!(
        "🧪 Running {} quality rules on '{}'",
        session.rules().len(),
        args.data.display()
    );

    let (results, summary) = session.check();

    let mut table = new_table();
    table.set_header(vec!["Rule", "Type", "Failed", "Status"]);
    for result in &results {
        let status = if result.passed {
            Cell::new("PASS").fg(Color::Green)
        } else {
            Cell::new("FAIL").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(&result.label),
            Cell::new(&result.rule_type),
            Cell::new(result.failed_count),
            status,
        ]);
    }
    println!("{table}");

    let issues = if summary.issue_columns.is_empty() {
        "none".to_string()
    } else {
        summary.issue_columns.join(", ")
    };
    println!(
        "📊 Pass rate: {:.1}% | Failed rows: {} | Issue columns: {}",
        summary.pass_rate, summary.failed_row_total, issues
    );

    let report_path = args
        .report
        .unwrap_or_else(|| project_dir.join(&config.report.output));
    let generator = ReportGenerator::new(Arc::new(JinjaRenderer::new()?))
        .with_sample_rows(config.quality.report_sample_rows);
    let metadata = ReportMetadata::new(Utc::now())
        .with_title(config.report.title.clone())
        .with_source(args.data.display().to_string());
    let html = generator.render(
        session.current(),
        session.rules(),
        &results,
        &summary,
        &metadata,
    )?;
    atomic_write(&report_path, html)?;
    println!("📄 Report written to '{}'", report_path.display());

    if args.fail_on_violation && !summary.all_passed() {
        anyhow::bail!(
            "Quality check failed: {} of {} rules violated",
            results.iter().filter(|r| !r.passed).count(),
            results.len()
        );
    }

    Ok(())
}
