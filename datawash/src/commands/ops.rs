// datawash/src/commands/ops.rs

use anyhow::Result;

use super::{new_table, registry};

pub fn execute() -> Result<()> {
    let registry = registry();
    println!("📚 {} registered operations", registry.len());
    let mut table = new_table();
    table.set_header(vec!["Operation"]);
    for name in registry.names() {
        table.add_row(vec![name]);
    }
    println!("{table}");
    Ok(())
}
