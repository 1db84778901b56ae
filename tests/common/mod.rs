//! In-memory collaborators shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use medtechone_retrieval::embedding::{EmbeddingBackend, EmbeddingProvider};
use medtechone_retrieval::errors::{Result, RetrievalError};
use medtechone_retrieval::rag::{HybridSearchEngine, SearchConfig};
use medtechone_retrieval::store::{CatalogSource, MatchField, PageChunk, PassageStore, SitePages};
use medtechone_retrieval::types::{EmbeddingVector, PassageKind, ResourceRecord, StoreRecord};

pub const TEST_DIM: usize = 4;

/// Embedding backend returning a constant vector
#[derive(Default)]
pub struct FakeEmbedder {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeEmbedder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl EmbeddingBackend for FakeEmbedder {
    fn id(&self) -> &str {
        "fake"
    }

    async fn generate_embedding(&self, _text: &str, dimension: usize) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RetrievalError::backend("embeddings", 503, "unavailable"));
        }
        Ok(vec![0.5; dimension])
    }
}

/// Passage store with canned responses and call recording
#[derive(Default)]
pub struct FakeStore {
    pub pdf_vector: Vec<StoreRecord>,
    pub web_vector: Vec<StoreRecord>,
    pub pdf_vector_fails: bool,
    pub web_vector_fails: bool,
    pub substring_fails: bool,
    /// Content matches keyed by keyword; title queries return nothing
    pub substring: HashMap<String, Vec<StoreRecord>>,
    pub web_delay: Option<Duration>,
    pub vector_calls: Mutex<Vec<(PassageKind, Option<f32>)>>,
    pub substring_calls: Mutex<Vec<(MatchField, String)>>,
}

impl FakeStore {
    pub fn substring_call_count(&self) -> usize {
        self.substring_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PassageStore for FakeStore {
    async fn vector_search(
        &self,
        store: PassageKind,
        _embedding: &EmbeddingVector,
        match_count: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<StoreRecord>> {
        self.vector_calls.lock().unwrap().push((store, threshold));

        let (records, fails) = match store {
            PassageKind::Pdf => (&self.pdf_vector, self.pdf_vector_fails),
            PassageKind::Web => {
                if let Some(delay) = self.web_delay {
                    tokio::time::sleep(delay).await;
                }
                (&self.web_vector, self.web_vector_fails)
            }
        };

        if fails {
            return Err(RetrievalError::backend("supabase", 500, "rpc failed"));
        }
        Ok(records.iter().take(match_count).cloned().collect())
    }

    async fn substring_search(
        &self,
        _store: PassageKind,
        field: MatchField,
        pattern: &str,
        limit: usize,
    ) -> Result<Vec<StoreRecord>> {
        self.substring_calls
            .lock()
            .unwrap()
            .push((field, pattern.to_string()));

        if self.substring_fails {
            return Err(RetrievalError::backend("supabase", 500, "query failed"));
        }
        if field == MatchField::Title {
            return Ok(Vec::new());
        }
        Ok(self
            .substring
            .get(pattern)
            .map(|records| records.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

pub fn engine_with(store: FakeStore) -> (HybridSearchEngine, Arc<FakeStore>) {
    engine_with_backend(store, FakeEmbedder::default())
}

pub fn engine_with_backend(
    store: FakeStore,
    backend: FakeEmbedder,
) -> (HybridSearchEngine, Arc<FakeStore>) {
    let store = Arc::new(store);
    let embeddings = Arc::new(EmbeddingProvider::new(Arc::new(backend), TEST_DIM, 16));
    let engine =
        HybridSearchEngine::with_config(embeddings, store.clone(), SearchConfig::default());
    (engine, store)
}

pub fn record(id: &str, similarity: Option<f64>) -> StoreRecord {
    let record = StoreRecord::new(id, format!("Title {}", id), format!("Content {}", id));
    match similarity {
        Some(s) => record.with_similarity(s),
        None => record,
    }
}

/// Catalog returning a fixed record set
#[derive(Default)]
pub struct FakeCatalog {
    pub records: Vec<ResourceRecord>,
    pub fail: bool,
    pub fetches: AtomicUsize,
}

impl FakeCatalog {
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_catalog(&self, _table: &str, max_records: usize) -> Result<Vec<ResourceRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RetrievalError::backend("airtable", 401, "invalid token"));
        }
        Ok(self.records.iter().take(max_records).cloned().collect())
    }
}

pub fn resource(title: &str, score: u8, theme: &[&str]) -> ResourceRecord {
    let mut record = ResourceRecord {
        title: title.to_string(),
        theme: theme.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    };
    record.ecr_metadata.relevance_score = score;
    record
}

/// Crawled pages keyed by URL
#[derive(Default)]
pub struct FakePages {
    pub urls: Vec<String>,
    pub chunks: HashMap<String, Vec<PageChunk>>,
    pub fail: bool,
    pub chunk_calls: AtomicUsize,
}

impl FakePages {
    pub fn chunk_call_count(&self) -> usize {
        self.chunk_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SitePages for FakePages {
    async fn list_page_urls(&self, _source: &str) -> Result<Vec<String>> {
        if self.fail {
            return Err(RetrievalError::backend("supabase", 503, "unavailable"));
        }
        Ok(self.urls.clone())
    }

    async fn page_chunks(&self, url: &str, _source: &str) -> Result<Vec<PageChunk>> {
        self.chunk_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RetrievalError::backend("supabase", 503, "unavailable"));
        }
        Ok(self.chunks.get(url).cloned().unwrap_or_default())
    }
}

pub fn chunk(title: &str, content: &str, number: i64) -> PageChunk {
    PageChunk {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
        chunk_number: Some(number),
    }
}
