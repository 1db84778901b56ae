//! MedTechONE retrieval engine
//!
//! Hybrid retrieval over regulatory PDF passages and crawled web pages,
//! plus a ranked catalog of curated resources.
//!
//! # Architecture
//!
//! - **embedding**: query embeddings behind a bounded LRU cache
//! - **store**: Supabase vector/substring search and the Airtable catalog
//! - **rag**: hybrid search, ranking, catalog and page assembly
//! - **cache**: time-to-live cache shared by the catalog and page library

pub mod cache;
pub mod config;
pub mod embedding;
pub mod errors;
pub mod rag;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{Config, Credentials};
pub use errors::{Result, RetrievalError};
pub use rag::{HybridSearchEngine, ResourceCatalogRanker, RetrievalPipeline};

// Command-line surface for the medtechone binary
pub mod cli;
