// Hybrid retrieval module
pub mod engine;
pub mod keywords;

pub use engine::{HybridSearchEngine, SearchConfig, SearchReport};
pub use keywords::{derive_keywords, DEFAULT_BOOTSTRAP_TERMS};
