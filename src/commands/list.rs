use anyhow::{Result, bail};
use jiff::Timestamp;
use serde::Serialize;

use crate::db::Database;
use crate::id::generate_id;
use crate::models::{GroceryList, ListCounts};

/// A list together with its current item tallies.
#[derive(Debug, Serialize)]
pub struct ListOverview {
    #[serde(flatten)]
    pub list: GroceryList,
    pub counts: ListCounts,
}

pub fn create(name: String, db: &mut Database) -> Result<GroceryList> {
    let name = name.trim().to_string();
    if name.is_empty() {
        bail!("List name must not be empty");
    }

    let list = GroceryList::new(generate_id(), name, Timestamp::now());
    db.create_list(list.clone())?;
    tracing::info!(list = %list.id, "created list");
    Ok(list)
}

pub fn list(db: &Database) -> Vec<ListOverview> {
    db.list_lists()
        .into_iter()
        .map(|list| ListOverview {
            counts: db.compute_list_counts(&list.id),
            list: list.clone(),
        })
        .collect()
}
