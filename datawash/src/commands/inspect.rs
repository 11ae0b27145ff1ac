// datawash/src/commands/inspect.rs

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Color};

use super::{new_table, print_rows, read_dataset};

const TOP_SHOWN: usize = 5;

fn stat(value: f64) -> String {
    format!("{value:.3}")
}

pub async fn execute(data: PathBuf, limit: usize) -> Result<()> {
    println!("🔍 Inspecting '{}'", data.display());
    let dataset = read_dataset(&data).await?;
    println!(
        "   Shape: {} rows × {} columns",
        dataset.num_rows(),
        dataset.num_columns()
    );

    let profile = dataset.profile()?;
    let mut table = new_table();
    table.set_header(vec!["Column", "Type", "Missing", "Missing %", "Distinct"]);
    for column in &profile.columns {
        let missing = if column.missing > 0 {
            Cell::new(column.missing).fg(Color::Yellow)
        } else {
            Cell::new(column.missing)
        };
        table.add_row(vec![
            Cell::new(&column.name),
            Cell::new(&column.dtype),
            missing,
            Cell::new(format!("{:.1}", column.missing_pct)),
            Cell::new(column.distinct),
        ]);
    }
    println!("{table}");

    let numeric: Vec<_> = profile
        .columns
        .iter()
        .filter_map(|c| c.numeric.as_ref().map(|n| (&c.name, n)))
        .collect();
    if !numeric.is_empty() {
        println!("\n📈 Numeric columns:");
        let mut table = new_table();
        table.set_header(vec!["Column", "Mean", "Std", "Min", "Q25", "Median", "Q75", "Max"]);
        for (name, n) in numeric {
            table.add_row(vec![
                name.clone(),
                stat(n.mean),
                n.std.map(stat).unwrap_or_else(|| "-".to_string()),
                stat(n.min),
                stat(n.q25),
                stat(n.median),
                stat(n.q75),
                stat(n.max),
            ]);
        }
        println!("{table}");
    }

    let categorical: Vec<_> = profile
        .columns
        .iter()
        .filter(|c| !c.top_values.is_empty())
        .collect();
    if !categorical.is_empty() {
        println!("\n🏷️  Top values:");
        let mut table = new_table();
        table.set_header(vec!["Column", "Most frequent", "Count", "Top values"]);
        for column in categorical {
            let top = column
                .top_values
                .iter()
                .take(TOP_SHOWN)
                .map(|t| format!("{} ({})", t.value, t.count))
                .collect::<Vec<_>>()
                .join(", ");
            let (value, count) = column
                .most_frequent()
                .map(|t| (t.value.clone(), t.count.to_string()))
                .unwrap_or_default();
            table.add_row(vec![column.name.clone(), value, count, top]);
        }
        println!("{table}");
    }

    println!("\n📋 Sample rows:");
    print_rows(&dataset, limit)
}
