use anyhow::{Result, bail};
use jiff::Timestamp;
use serde::Serialize;

use crate::config::Config;
use crate::db::Database;
use crate::helpers::not_found;
use crate::id::generate_id;
use crate::models::{Item, ItemState, ListState, Note};
use crate::similarity::{Candidate, rank};

/// Fields for a new item as given on the command line.
#[derive(Debug, Default)]
pub struct NewItem {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: Option<String>,
}

/// Result of adding an item, including a near-identical item already on the list.
#[derive(Debug, Serialize)]
pub struct AddResult {
    pub item: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similar: Option<Item>,
    pub list_reopened: bool,
}

/// Result of moving an item between states, including any list state change.
#[derive(Debug, Serialize)]
pub struct TransitionResult {
    pub item: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_state: Option<ListState>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn add(list_id: &str, new: NewItem, config: &Config, db: &mut Database) -> Result<AddResult> {
    if db.get_list(list_id).is_none() {
        return Err(not_found(
            "List",
            list_id,
            &db.list_ids(),
            config.matching.suggest_distance,
        ));
    }

    let name = new.name.trim().to_string();
    if name.is_empty() {
        bail!("Item name must not be empty");
    }

    let quantity = new.quantity.unwrap_or(1.0);
    if !quantity.is_finite() || quantity <= 0.0 {
        bail!("Quantity must be a positive number, got {quantity}");
    }

    let existing: Vec<Candidate> = db
        .list_items(list_id)
        .into_iter()
        .map(Item::as_candidate)
        .collect::<Result<_>>()?;
    let similar = rank(&name, &existing)
        .first()
        .filter(|best| best.distance <= config.matching.duplicate_distance)
        .and_then(|best| db.get_item(best.candidate.id()))
        .cloned();

    let item = Item::new(generate_id(), list_id.to_string(), name, Timestamp::now())
        .with_quantity(quantity, non_blank(new.unit))
        .with_category(non_blank(new.category));

    db.create_item(item.clone())?;
    tracing::info!(item = %item.id, list = %list_id, "added item");

    let list_reopened = sync_list_state(list_id, db)? == Some(ListState::Open);

    Ok(AddResult {
        item,
        similar,
        list_reopened,
    })
}

pub fn list(list_id: &str, config: &Config, db: &Database) -> Result<Vec<Item>> {
    if db.get_list(list_id).is_none() {
        return Err(not_found(
            "List",
            list_id,
            &db.list_ids(),
            config.matching.suggest_distance,
        ));
    }

    Ok(db.list_items(list_id).into_iter().cloned().collect())
}

pub fn buy(item_id: &str, config: &Config, db: &mut Database) -> Result<TransitionResult> {
    apply_transition(item_id, &[ItemState::Needed], ItemState::Bought, "buy", config, db)
}

pub fn skip(item_id: &str, config: &Config, db: &mut Database) -> Result<TransitionResult> {
    apply_transition(item_id, &[ItemState::Needed], ItemState::Skipped, "skip", config, db)
}

pub fn restore(item_id: &str, config: &Config, db: &mut Database) -> Result<TransitionResult> {
    apply_transition(
        item_id,
        &[ItemState::Bought, ItemState::Skipped],
        ItemState::Needed,
        "restore",
        config,
        db,
    )
}

pub fn note(item_id: &str, text: String, config: &Config, db: &mut Database) -> Result<Item> {
    let mut item = find_item(item_id, config, db)?;

    let text = text.trim().to_string();
    if text.is_empty() {
        bail!("Note text must not be empty");
    }

    let now = Timestamp::now();
    item.notes.push(Note::new(generate_id(), text, now));
    item.updated_at = now;

    db.update_item(item.clone())?;
    Ok(item)
}

fn find_item(item_id: &str, config: &Config, db: &Database) -> Result<Item> {
    db.get_item(item_id)
        .cloned()
        .ok_or_else(|| not_found("Item", item_id, &db.item_ids(), config.matching.suggest_distance))
}

fn apply_transition(
    item_id: &str,
    from: &[ItemState],
    to: ItemState,
    verb: &str,
    config: &Config,
    db: &mut Database,
) -> Result<TransitionResult> {
    let mut item = find_item(item_id, config, db)?;

    if !item.transition(from, to, Timestamp::now()) {
        let expected: Vec<String> = from.iter().map(|s| format!("'{}'", s.as_ref())).collect();
        bail!(
            "Item must be {} to {verb}. Current state: {}",
            expected.join(" or "),
            item.state.as_ref()
        );
    }

    db.update_item(item.clone())?;
    tracing::info!(item = %item.id, state = item.state.as_ref(), "item transitioned");

    let list_state = sync_list_state(&item.list_id, db)?;
    Ok(TransitionResult { item, list_state })
}

/// Complete a list once nothing on it is needed, reopen it when something is
/// again. Returns the new state if it changed.
fn sync_list_state(list_id: &str, db: &mut Database) -> Result<Option<ListState>> {
    let counts = db.compute_list_counts(list_id);
    let Some(mut list) = db.get_list(list_id).cloned() else {
        bail!("List not found: {list_id}");
    };

    let now = Timestamp::now();
    match list.state {
        ListState::Open if counts.item_count > 0 && counts.needed == 0 => list.mark_completed(now),
        ListState::Completed if counts.needed > 0 => list.reopen(now),
        _ => return Ok(None),
    }

    let state = list.state;
    db.update_list(list)?;
    tracing::info!(list = %list_id, state = state.as_ref(), "list state changed");
    Ok(Some(state))
}
