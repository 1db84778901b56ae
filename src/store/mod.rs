//! External content stores and catalog sources
//!
//! The retrieval core only talks to these traits. `SupabaseStore` and
//! `AirtableCatalog` are the production implementations; tests use
//! in-memory fakes.

pub mod airtable;
pub mod supabase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::types::{EmbeddingVector, PassageKind, ResourceRecord, StoreRecord};

pub use airtable::AirtableCatalog;
pub use supabase::SupabaseStore;

/// Column a substring search matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Content,
    Title,
}

impl MatchField {
    pub fn column(&self) -> &'static str {
        match self {
            MatchField::Content => "content",
            MatchField::Title => "title",
        }
    }
}

/// Passage store supporting vector and substring search
#[async_trait]
pub trait PassageStore: Send + Sync {
    /// Nearest passages to `embedding`, best first, at most `match_count`.
    /// `threshold` is the minimum similarity; `None` applies no threshold.
    async fn vector_search(
        &self,
        store: PassageKind,
        embedding: &EmbeddingVector,
        match_count: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<StoreRecord>>;

    /// Passages whose `field` contains `pattern`, case-insensitively
    async fn substring_search(
        &self,
        store: PassageKind,
        field: MatchField,
        pattern: &str,
        limit: usize,
    ) -> Result<Vec<StoreRecord>>;
}

/// One chunk of a crawled documentation page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageChunk {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub chunk_number: Option<i64>,
}

/// Access to crawled documentation pages
#[async_trait]
pub trait SitePages: Send + Sync {
    /// URLs of every chunk tagged with `source` (may repeat)
    async fn list_page_urls(&self, source: &str) -> Result<Vec<String>>;

    /// Chunks of one page, ordered by chunk number
    async fn page_chunks(&self, url: &str, source: &str) -> Result<Vec<PageChunk>>;
}

/// Tabular resource catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self, table: &str, max_records: usize) -> Result<Vec<ResourceRecord>>;
}

/// Escape LIKE wildcards so a keyword matches literally
pub fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
