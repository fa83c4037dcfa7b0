use anyhow::Result;
use serde::Serialize;

use crate::commands::list::{self, ListOverview};
use crate::config::Config;
use crate::db::Database;
use crate::helpers::not_found;
use crate::models::{GroceryList, Item, ListCounts};

#[derive(Debug, Serialize)]
pub struct ListStatus {
    #[serde(flatten)]
    pub list: GroceryList,
    pub items: Vec<Item>,
    pub counts: ListCounts,
}

/// Result of a status query - can be a single item, single list, or all lists.
#[derive(Debug)]
pub enum StatusResult {
    Item(Item),
    List(ListStatus),
    AllLists(Vec<ListOverview>),
}

pub fn run(
    list_id: Option<String>,
    item_id: Option<String>,
    config: &Config,
    db: &Database,
) -> Result<StatusResult> {
    if let Some(iid) = item_id {
        return db
            .get_item(&iid)
            .cloned()
            .map(StatusResult::Item)
            .ok_or_else(|| not_found("Item", &iid, &db.item_ids(), config.matching.suggest_distance));
    }

    if let Some(lid) = list_id {
        return get_list(&lid, config, db).map(StatusResult::List);
    }

    Ok(StatusResult::AllLists(list::list(db)))
}

fn get_list(list_id: &str, config: &Config, db: &Database) -> Result<ListStatus> {
    let list = db
        .get_list(list_id)
        .ok_or_else(|| not_found("List", list_id, &db.list_ids(), config.matching.suggest_distance))?
        .clone();

    Ok(ListStatus {
        list,
        items: db.list_items(list_id).into_iter().cloned().collect(),
        counts: db.compute_list_counts(list_id),
    })
}
