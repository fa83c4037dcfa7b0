use anyhow::{Error, anyhow};

use crate::similarity::distance;

/// Find the most similar ID from a list of candidates, within `max_distance` edits.
///
/// IDs are case-sensitive, so no folding happens here.
pub fn find_similar_id<'a>(
    target: &str,
    candidates: &[&'a str],
    max_distance: usize,
) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (candidate, distance(target, candidate)))
        .filter(|(_, d)| *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(id, _)| id)
}

/// "`<kind>` not found" error, with a suggestion when a known ID is close.
pub fn not_found(kind: &str, id: &str, known: &[&str], max_distance: usize) -> Error {
    match find_similar_id(id, known, max_distance) {
        Some(suggestion) => anyhow!("{kind} not found: {id}\nDid you mean: {suggestion}"),
        None => anyhow!("{kind} not found: {id}"),
    }
}
