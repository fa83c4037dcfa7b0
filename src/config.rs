use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::commands::summary::GroupBy;
use crate::similarity::DEFAULT_TOP_N;

pub const CONFIG_FILE: &str = "config.toml";

/// Settings loaded from `.pantry/config.toml`. Every field has a default, so a
/// missing file or a partial one is fine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub matching: MatchingConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// How many matches `pt match` prints without `--top`.
    pub top_n: usize,
    /// Max distance for "Did you mean" suggestions on unknown IDs.
    pub suggest_distance: usize,
    /// Max distance at which a new item is reported as already listed.
    pub duplicate_distance: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            suggest_distance: 2,
            duplicate_distance: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub group_by: GroupBy,
}

impl Config {
    pub fn path(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    pub fn load(base: &Path) -> Result<Self> {
        let path = Self::path(base);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn write_default(base: &Path) -> Result<()> {
        let content =
            toml::to_string(&Self::default()).context("Failed to serialize default config")?;
        fs::write(Self::path(base), content).context("Failed to write config file")
    }
}
