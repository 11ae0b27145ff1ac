// datawash/src/commands/pipeline.rs

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use datawash_core::Pipeline;
use datawash_core::infrastructure::config::{load_pipeline_file, save_pipeline_file};

use super::{new_table, registry};

pub fn init(file: PathBuf, force: bool) -> Result<()> {
    if file.exists() && !force {
        bail!(
            "'{}' already exists (use --force to overwrite)",
            file.display()
        );
    }
    save_pipeline_file(&file, &Pipeline::new(registry()))?;
    println!("📝 Created empty pipeline '{}'", file.display());
    Ok(())
}

pub fn add(file: PathBuf, op: String, params: String, label: Option<String>) -> Result<()> {
    let registry = registry();
    let parameters = match serde_json::from_str::<Value>(&params)
        .with_context(|| format!("--params is not valid JSON: {}", params))?
    {
        Value::Object(map) => map,
        other => bail!("--params must be a JSON object, got: {}", other),
    };

    if !registry.contains(&op) {
        println!(
            "⚠️  '{}' is not a registered operation; replays will skip it",
            op
        );
    }

    let mut pipeline = load_pipeline_file(&file, registry)?;
    pipeline.add_step(&op, parameters, label);
    save_pipeline_file(&file, &pipeline)?;
    println!("➕ Added '{}' as step {}", op, pipeline.len() - 1);
    Ok(())
}

pub fn undo(file: PathBuf) -> Result<()> {
    let mut pipeline = load_pipeline_file(&file, registry())?;
    if !pipeline.undo() {
        println!("ℹ️  '{}' has no steps to undo", file.display());
        return Ok(());
    }
    save_pipeline_file(&file, &pipeline)?;
    println!("↩️  Removed last step, {} remaining", pipeline.len());
    Ok(())
}

pub fn show(file: PathBuf) -> Result<()> {
    let pipeline = load_pipeline_file(&file, registry())?;
    println!(
        "📝 Pipeline '{}' (version {}, {} steps)",
        file.display(),
        pipeline.version(),
        pipeline.len()
    );
    if pipeline.is_empty() {
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["#", "Operation", "Params", "Label", "Recorded"]);
    for (i, step) in pipeline.steps().iter().enumerate() {
        table.add_row(vec![
            i.to_string(),
            step.operation().to_string(),
            Value::Object(step.parameters().clone()).to_string(),
            step.label().unwrap_or("").to_string(),
            step.timestamp().format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
