use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::db::atomic_write;

pub const LIST_FILE: &str = "list.toml";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "snake_case")]
pub enum ListState {
    Open,
    Completed,
}

/// Item tallies for one list, computed from its items rather than stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ListCounts {
    pub item_count: usize,
    pub needed: usize,
    pub bought: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryList {
    pub id: String,
    pub name: String,
    pub state: ListState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

impl GroceryList {
    pub fn new(id: String, name: String, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            state: ListState::Open,
            created_at,
            updated_at: created_at,
            completed_at: None,
        }
    }

    pub fn dir(&self, base: &Path) -> PathBuf {
        base.join(&self.id)
    }

    pub fn file_path(&self, base: &Path) -> PathBuf {
        self.dir(base).join(LIST_FILE)
    }

    pub fn write_file(&self, base: &Path) -> Result<()> {
        let path = self.file_path(base);
        let content = toml::to_string(self).context("Failed to serialize list")?;
        atomic_write(&path, content.as_bytes())
    }

    pub fn mark_completed(&mut self, now: Timestamp) {
        self.state = ListState::Completed;
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    pub fn reopen(&mut self, now: Timestamp) {
        self.state = ListState::Open;
        self.completed_at = None;
        self.updated_at = now;
    }
}
