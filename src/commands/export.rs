use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::db::Database;
use crate::helpers::not_found;
use crate::models::{GroceryList, Item};

pub const HEADER: [&str; 6] = ["name", "quantity", "unit", "category", "state", "list"];

/// Write `items` as CSV, one row per item, header first even when empty.
pub fn write_csv<W: Write>(list: &GroceryList, items: &[&Item], writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(HEADER)
        .context("Failed to write CSV header")?;

    for item in items {
        let quantity = item.quantity.to_string();
        csv.write_record([
            item.name.as_str(),
            quantity.as_str(),
            item.unit.as_deref().unwrap_or_default(),
            item.category.as_deref().unwrap_or_default(),
            item.state.as_ref(),
            list.name.as_str(),
        ])
        .with_context(|| format!("Failed to write CSV row for item {}", item.id))?;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Export one list. Writes to `output` when given, otherwise stdout.
/// Returns the number of rows written.
pub fn run(
    list_id: &str,
    output: Option<PathBuf>,
    config: &Config,
    db: &Database,
) -> Result<usize> {
    let list = db
        .get_list(list_id)
        .ok_or_else(|| not_found("List", list_id, &db.list_ids(), config.matching.suggest_distance))?;
    let items = db.list_items(list_id);

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(list, &items, file)?;
            tracing::info!(list = %list_id, path = %path.display(), rows = items.len(), "exported list");
        }
        None => write_csv(list, &items, io::stdout().lock())?,
    }

    Ok(items.len())
}
