use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use super::Note;
use crate::db::atomic_write;
use crate::similarity::Candidate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "snake_case")]
pub enum ItemState {
    Needed,
    Bought,
    Skipped,
}

fn default_quantity() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub list_id: String,
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub state: ItemState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bought_at: Option<Timestamp>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Item {
    pub fn new(id: String, list_id: String, name: String, created_at: Timestamp) -> Self {
        Self {
            id,
            list_id,
            name,
            quantity: default_quantity(),
            unit: None,
            category: None,
            state: ItemState::Needed,
            created_at,
            updated_at: created_at,
            bought_at: None,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: f64, unit: Option<String>) -> Self {
        self.quantity = quantity;
        self.unit = unit;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    pub fn file_path(&self, base: &Path) -> PathBuf {
        base.join(&self.list_id).join(format!("{}.toml", self.id))
    }

    pub fn write_file(&self, base: &Path) -> Result<()> {
        let path = self.file_path(base);
        let content = toml::to_string(self).context("Failed to serialize item")?;
        atomic_write(&path, content.as_bytes())
    }

    /// Move to `to` only if currently in one of `from`. Returns whether it moved.
    pub fn transition(&mut self, from: &[ItemState], to: ItemState, now: Timestamp) -> bool {
        if !from.contains(&self.state) {
            return false;
        }

        self.state = to;
        self.updated_at = now;
        self.bought_at = (to == ItemState::Bought).then_some(now);
        true
    }

    /// Quantity with unit, e.g. `2 l` or `3`.
    pub fn amount(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{} {unit}", self.quantity),
            None => self.quantity.to_string(),
        }
    }

    pub fn as_candidate(&self) -> Result<Candidate> {
        Candidate::new(self.id.clone(), self.name.clone())
            .with_context(|| format!("Item has an invalid id: {:?}", self.id))
    }
}
