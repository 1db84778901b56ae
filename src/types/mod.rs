//! Type definitions module
//!
//! Value objects exchanged between the retrieval core and its callers.

pub mod outcome;
pub mod passage;
pub mod resource;

// Re-export commonly used types
pub use outcome::{EmbeddingStatus, StageOutcome};
pub use passage::{EmbeddingVector, Passage, PassageKind, StoreRecord, DEFAULT_EMBEDDING_DIM};
pub use resource::{EcrMetadata, ResourceRecord, DEFAULT_RELEVANCE_SCORE};
