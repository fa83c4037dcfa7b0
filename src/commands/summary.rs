use std::collections::HashMap;

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::config::Config;
use crate::db::Database;
use crate::helpers::not_found;
use crate::models::{Item, ItemState};

pub const UNCATEGORIZED: &str = "uncategorized";

/// Totals are kept to three decimal places (grams, millilitres).
const QUANTITY_SCALE: f64 = 1000.0;

fn round_quantity(quantity: f64) -> f64 {
    (quantity * QUANTITY_SCALE).round() / QUANTITY_SCALE
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "snake_case")]
pub enum GroupBy {
    #[default]
    Category,
    Name,
    State,
}

impl GroupBy {
    fn key(self, item: &Item) -> String {
        match self {
            Self::Category => item
                .category
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            Self::Name => item.name.trim().to_lowercase(),
            Self::State => item.state.as_ref().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitTotal {
    pub unit: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemGroup {
    pub key: String,
    pub count: usize,
    pub needed: usize,
    pub bought: usize,
    pub skipped: usize,
    pub quantities: Vec<UnitTotal>,
}

impl ItemGroup {
    fn new(key: String) -> Self {
        Self {
            key,
            count: 0,
            needed: 0,
            bought: 0,
            skipped: 0,
            quantities: Vec::new(),
        }
    }

    fn push(&mut self, item: &Item) {
        self.count += 1;
        match item.state {
            ItemState::Needed => self.needed += 1,
            ItemState::Bought => self.bought += 1,
            ItemState::Skipped => self.skipped += 1,
        }

        let unit = item.unit.as_deref().unwrap_or_default();
        match self.quantities.iter_mut().find(|q| q.unit == unit) {
            Some(total) => total.total = round_quantity(total.total + item.quantity),
            None => self.quantities.push(UnitTotal {
                unit: unit.to_string(),
                total: round_quantity(item.quantity),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Summary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    pub group_by: GroupBy,
    pub groups: Vec<ItemGroup>,
}

/// Group items by `by` in a single pass. Groups keep first-seen order.
pub fn group_items<'a>(items: impl IntoIterator<Item = &'a Item>, by: GroupBy) -> Vec<ItemGroup> {
    let mut groups: Vec<ItemGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let key = by.key(item);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(ItemGroup::new(key));
            groups.len() - 1
        });
        groups[slot].push(item);
    }

    groups
}

pub fn run(
    list_id: Option<String>,
    by: Option<GroupBy>,
    config: &Config,
    db: &Database,
) -> Result<Summary> {
    let by = by.unwrap_or(config.summary.group_by);

    let items = match &list_id {
        Some(id) => {
            if db.get_list(id).is_none() {
                return Err(not_found("List", id, &db.list_ids(), config.matching.suggest_distance));
            }
            db.list_items(id)
        }
        None => db.all_items(),
    };

    Ok(Summary {
        list_id,
        group_by: by,
        groups: group_items(items, by),
    })
}
