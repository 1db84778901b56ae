// Hybrid retrieval for the MedTechONE assistant
//
// Components:
// - Retrieval: vector search with keyword fallback over PDF and web passages
// - Re-ranking: per-store dedupe and similarity ordering
// - Catalog: cached resource catalog with filtering and relevance ranking
// - Pages: documentation page listing and reassembly
// - Context: rendering of retrieved material for the prompt
// - Pipeline: wiring of the production clients

pub mod catalog;
pub mod context;
pub mod pages;
pub mod pipeline;
pub mod reranking;
pub mod retrieval;

// Re-export key types
pub use catalog::{CatalogConfig, CatalogListing, ResourceCatalog, ResourceCatalogRanker};
pub use context::{passages_to_json, render_resources};
pub use pages::PageLibrary;
pub use pipeline::RetrievalPipeline;
pub use reranking::{merge_and_rank, rank_by_similarity, UniquePassages};
pub use retrieval::{derive_keywords, HybridSearchEngine, SearchConfig, SearchReport};
