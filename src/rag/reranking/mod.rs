// Passage ranking module
pub mod scorer;

pub use scorer::{merge_and_rank, rank_by_similarity, UniquePassages};
