use thiserror::Error;

/// Rejections raised while building a [`crate::similarity::Candidate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CandidateError {
    #[error("candidate id must not be empty")]
    EmptyId,
}
