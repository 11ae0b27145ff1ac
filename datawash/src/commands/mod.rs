// datawash/src/commands/mod.rs

pub mod apply;
pub mod check;
pub mod inspect;
pub mod ops;
pub mod pipeline;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use datawash_core::Dataset;
use datawash_core::TransformRegistry;
use datawash_core::infrastructure::adapters::DataFusionAdapter;
use datawash_core::ports::source::DatasetSource;

pub(crate) fn registry() -> Arc<TransformRegistry> {
    Arc::new(TransformRegistry::with_builtins())
}

pub(crate) async fn read_dataset(path: &Path) -> Result<Dataset> {
    let adapter = DataFusionAdapter::new();
    adapter
        .read(path)
        .await
        .with_context(|| format!("Failed to read data file '{}'", path.display()))
}

pub(crate) fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).apply_modifier(UTF8_ROUND_CORNERS);
    table
}

/// Prints the first `limit` rows, row ids in the first column.
pub(crate) fn print_rows(dataset: &Dataset, limit: usize) -> Result<()> {
    if dataset.num_rows() == 0 || limit == 0 {
        println!("   (no rows)");
        return Ok(());
    }
    let mut table = new_table();
    let mut header = vec!["row_id".to_string()];
    header.extend(dataset.column_names());
    table.set_header(header);

    let rows = dataset.display_rows(limit)?;
    for (row_id, cells) in dataset.row_ids().iter().zip(rows) {
        let mut line = vec![row_id.to_string()];
        line.extend(cells);
        table.add_row(line);
    }
    println!("{table}");
    if dataset.num_rows() > limit {
        println!("   ... {} more rows", dataset.num_rows() - limit);
    }
    Ok(())
}
