//! Typed outcomes for stages that recover from backend failures
//!
//! The retrieval core never fails outright, but it keeps track of why a
//! result is empty so callers can tell "nothing matched" apart from
//! "the backend was down".

use serde::{Deserialize, Serialize};

/// Result of one external call (or group of calls) inside an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StageOutcome {
    /// Stage produced this many new items
    Hits(usize),
    /// Stage ran and produced nothing
    Empty,
    /// Stage failed; its contribution was treated as empty
    Failed(String),
    /// Stage was not needed
    Skipped,
    /// Stage was aborted by the caller's cancellation
    Cancelled,
}

impl StageOutcome {
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            StageOutcome::Empty
        } else {
            StageOutcome::Hits(count)
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StageOutcome::Failed(_))
    }

    pub fn hits(&self) -> usize {
        match self {
            StageOutcome::Hits(n) => *n,
            _ => 0,
        }
    }
}

/// How the query embedding was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum EmbeddingStatus {
    /// Fresh call to the embedding backend
    Computed,
    /// Served from the memoization cache
    Cached,
    /// Backend failed; a zero vector was substituted
    Fallback(String),
}

impl EmbeddingStatus {
    pub fn is_fallback(&self) -> bool {
        matches!(self, EmbeddingStatus::Fallback(_))
    }
}
