//! Resource catalog: snapshot caching, filtering and relevance ranking

pub mod ranker;
pub mod service;

pub use ranker::ResourceCatalogRanker;
pub use service::{CatalogConfig, CatalogListing, ResourceCatalog};
