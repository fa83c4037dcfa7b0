use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::Config;
use crate::db::Database;
use crate::helpers::not_found;
use crate::models::Item;
use crate::similarity::{Candidate, rank};

/// Where the candidates for a match come from.
#[derive(Debug)]
pub enum MatchSource {
    /// Items in one list, or in every list when `None`.
    Items(Option<String>),
    /// A JSON array of `{"id": ..., "name": ...}` objects.
    File(PathBuf),
}

#[derive(Debug, Serialize)]
pub struct Match {
    pub id: String,
    pub name: String,
    pub distance: usize,
}

#[derive(Debug, Serialize)]
pub struct MatchResult {
    pub term: String,
    pub matches: Vec<Match>,
}

pub fn load_candidates(source: &MatchSource, config: &Config, db: &Database) -> Result<Vec<Candidate>> {
    match source {
        MatchSource::Items(Some(list_id)) => {
            if db.get_list(list_id).is_none() {
                return Err(not_found(
                    "List",
                    list_id,
                    &db.list_ids(),
                    config.matching.suggest_distance,
                ));
            }
            db.list_items(list_id)
                .into_iter()
                .map(Item::as_candidate)
                .collect()
        }
        MatchSource::Items(None) => db.all_items().into_iter().map(Item::as_candidate).collect(),
        MatchSource::File(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid candidate list in {}", path.display()))
        }
    }
}

pub fn run(
    term: String,
    source: MatchSource,
    top_n: Option<usize>,
    config: &Config,
    db: &Database,
) -> Result<MatchResult> {
    let top_n = top_n.unwrap_or(config.matching.top_n);
    let candidates = load_candidates(&source, config, db)?;
    tracing::debug!(term = %term, candidates = candidates.len(), top_n, "ranking candidates");

    let matches = rank(&term, &candidates)
        .into_iter()
        .take(top_n)
        .map(|scored| Match {
            id: scored.candidate.id().to_string(),
            name: scored.candidate.name().to_string(),
            distance: scored.distance,
        })
        .collect();

    Ok(MatchResult { term, matches })
}
