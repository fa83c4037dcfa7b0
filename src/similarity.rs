//! Edit distance and closest-match ranking for item names.

use serde::Deserialize;

use crate::error::CandidateError;

/// Number of matches returned when the caller does not ask for a specific count.
pub const DEFAULT_TOP_N: usize = 3;

/// Something that can be matched against a search term.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCandidate")]
pub struct Candidate {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct RawCandidate {
    id: String,
    name: String,
}

impl TryFrom<RawCandidate> for Candidate {
    type Error = CandidateError;

    fn try_from(raw: RawCandidate) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.name)
    }
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self, CandidateError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CandidateError::EmptyId);
        }

        Ok(Self {
            id,
            name: name.into(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredCandidate<'a> {
    pub candidate: &'a Candidate,
    pub distance: usize,
}

/// Levenshtein distance between `a` and `b`, counted in chars.
///
/// Case-sensitive; callers that want case-insensitive matching fold both
/// sides first (as [`rank`] does).
pub fn distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // table[i][j] is the distance between b[..i] and a[..j]
    let mut table = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (j, cell) in table[0].iter_mut().enumerate() {
        *cell = j;
    }
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            table[i][j] = if b[i - 1] == a[j - 1] {
                table[i - 1][j - 1]
            } else {
                let substitution = table[i - 1][j - 1];
                let insertion = table[i][j - 1];
                let deletion = table[i - 1][j];
                1 + substitution.min(insertion).min(deletion)
            };
        }
    }

    table[b.len()][a.len()]
}

/// Score every candidate against `term` and sort ascending by distance.
///
/// Both sides are lower-cased before comparison. The sort is stable, so
/// candidates at equal distance keep the order they were given in.
pub fn rank<'a>(term: &str, candidates: &'a [Candidate]) -> Vec<ScoredCandidate<'a>> {
    let term = term.to_lowercase();

    let mut scored: Vec<ScoredCandidate<'a>> = candidates
        .iter()
        .map(|candidate| ScoredCandidate {
            candidate,
            distance: distance(&candidate.name.to_lowercase(), &term),
        })
        .collect();

    scored.sort_by_key(|s| s.distance);
    scored
}

/// IDs of the `top_n` candidates closest to `term`, best first.
pub fn closest_matches<'a>(term: &str, candidates: &'a [Candidate], top_n: usize) -> Vec<&'a str> {
    if top_n == 0 {
        return Vec::new();
    }

    rank(term, candidates)
        .into_iter()
        .take(top_n)
        .map(|s| s.candidate.id())
        .collect()
}
