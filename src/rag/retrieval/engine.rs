// Hybrid retrieval engine: vector search first, keyword fallback second
use serde::{Deserialize, Serialize};
use std::future::{self, Future};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::embedding::EmbeddingProvider;
use crate::rag::reranking::{merge_and_rank, UniquePassages};
use crate::rag::retrieval::keywords::{derive_keywords, DEFAULT_BOOTSTRAP_TERMS};
use crate::store::{MatchField, PassageStore};
use crate::types::{EmbeddingStatus, Passage, PassageKind, StageOutcome};

/// Search parameters for hybrid retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum results per vector search
    pub match_count: usize,
    /// Minimum similarity for the PDF vector search (0.0 accepts everything)
    pub pdf_match_threshold: f32,
    /// Maximum results per keyword query
    pub keyword_limit: usize,
    /// Terms added to every keyword fallback
    pub bootstrap_terms: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            match_count: 10,
            pdf_match_threshold: 0.0,
            keyword_limit: 10,
            bootstrap_terms: DEFAULT_BOOTSTRAP_TERMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Passages plus a record of how each stage went
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    /// Ranked, deduplicated passages
    pub passages: Vec<Passage>,
    /// `None` when cancelled before the embedding was available
    pub embedding: Option<EmbeddingStatus>,
    pub pdf_vector: StageOutcome,
    pub pdf_keyword: StageOutcome,
    pub web_vector: StageOutcome,
    pub cancelled: bool,
}

impl SearchReport {
    /// True when an empty or partial result may be caused by an outage
    /// rather than by a lack of matching content
    pub fn backend_failed(&self) -> bool {
        self.embedding.as_ref().map_or(false, EmbeddingStatus::is_fallback)
            || self.pdf_vector.is_failure()
            || self.pdf_keyword.is_failure()
            || self.web_vector.is_failure()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

/// Mutable state shared between the stage runner and the cancellation path
struct SearchState {
    pdf: UniquePassages,
    web: UniquePassages,
    embedding: Option<EmbeddingStatus>,
    pdf_vector: StageOutcome,
    pdf_keyword: StageOutcome,
    web_vector: StageOutcome,
}

impl SearchState {
    fn new() -> Self {
        Self {
            pdf: UniquePassages::new(),
            web: UniquePassages::new(),
            embedding: None,
            pdf_vector: StageOutcome::Skipped,
            pdf_keyword: StageOutcome::Skipped,
            web_vector: StageOutcome::Skipped,
        }
    }
}

/// Hybrid search over the PDF and web-page stores
pub struct HybridSearchEngine {
    embeddings: Arc<EmbeddingProvider>,
    store: Arc<dyn PassageStore>,
    config: SearchConfig,
}

impl HybridSearchEngine {
    /// Create new engine with default parameters
    pub fn new(embeddings: Arc<EmbeddingProvider>, store: Arc<dyn PassageStore>) -> Self {
        Self::with_config(embeddings, store, SearchConfig::default())
    }

    /// Create with custom parameters
    pub fn with_config(
        embeddings: Arc<EmbeddingProvider>,
        store: Arc<dyn PassageStore>,
        config: SearchConfig,
    ) -> Self {
        Self {
            embeddings,
            store,
            config,
        }
    }

    /// Ranked passages for `query`. Never fails; empty means nothing usable.
    pub async fn search(&self, query: &str) -> Vec<Passage> {
        self.search_detailed(query).await.passages
    }

    /// Search and report per-stage outcomes
    pub async fn search_detailed(&self, query: &str) -> SearchReport {
        self.search_until(query, future::pending::<()>()).await
    }

    /// Search, giving up on in-flight calls after `timeout`
    pub async fn search_with_timeout(&self, query: &str, timeout: Duration) -> SearchReport {
        self.search_until(query, tokio::time::sleep(timeout)).await
    }

    /// Search until `cancel` resolves. On cancellation the in-flight store
    /// call is dropped and whatever was merged so far is ranked and returned.
    pub async fn search_until<C>(&self, query: &str, cancel: C) -> SearchReport
    where
        C: Future<Output = ()>,
    {
        let mut state = SearchState::new();

        let cancelled = tokio::select! {
            biased;
            _ = cancel => true,
            _ = self.run_stages(query, &mut state) => false,
        };

        if cancelled {
            warn!(query, "Search cancelled, returning partial results");
        }

        let passages = merge_and_rank(vec![state.pdf, state.web]);
        info!(query, results = passages.len(), cancelled, "Hybrid search finished");

        SearchReport {
            query: query.to_string(),
            passages,
            embedding: state.embedding,
            pdf_vector: state.pdf_vector,
            pdf_keyword: state.pdf_keyword,
            web_vector: state.web_vector,
            cancelled,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// Each stage is marked `Cancelled` before it awaits, so a stage dropped
    /// mid-call keeps that mark.
    async fn run_stages(&self, query: &str, state: &mut SearchState) {
        let (embedding, status) = self.embeddings.embed_with_status(query).await;
        state.embedding = Some(status);

        state.pdf_vector = StageOutcome::Cancelled;
        state.pdf_vector = match self
            .store
            .vector_search(
                PassageKind::Pdf,
                &embedding,
                self.config.match_count,
                Some(self.config.pdf_match_threshold),
            )
            .await
        {
            Ok(records) => StageOutcome::from_count(state.pdf.extend(PassageKind::Pdf, records)),
            Err(e) => {
                warn!(error = %e, "PDF vector search failed");
                StageOutcome::Failed(e.to_string())
            }
        };

        if state.pdf.is_empty() {
            state.pdf_keyword = StageOutcome::Cancelled;
            let outcome = self.keyword_fallback(query, &mut state.pdf).await;
            state.pdf_keyword = outcome;
        }

        state.web_vector = StageOutcome::Cancelled;
        state.web_vector = match self
            .store
            .vector_search(PassageKind::Web, &embedding, self.config.match_count, None)
            .await
        {
            Ok(records) => StageOutcome::from_count(state.web.extend(PassageKind::Web, records)),
            Err(e) => {
                warn!(error = %e, "Web vector search failed");
                StageOutcome::Failed(e.to_string())
            }
        };
    }

    /// Content and title substring queries per keyword, merged into `pdf`
    async fn keyword_fallback(&self, query: &str, pdf: &mut UniquePassages) -> StageOutcome {
        let keywords = derive_keywords(query, &self.config.bootstrap_terms);
        info!(keywords = keywords.len(), "PDF vector search empty, falling back to keywords");

        let mut added = 0;
        let mut last_error = None;

        for keyword in &keywords {
            for field in [MatchField::Content, MatchField::Title] {
                match self
                    .store
                    .substring_search(PassageKind::Pdf, field, keyword, self.config.keyword_limit)
                    .await
                {
                    Ok(records) => added += pdf.extend(PassageKind::Pdf, records),
                    Err(e) => {
                        debug!(keyword = %keyword, column = field.column(), error = %e, "Keyword query failed");
                        last_error = Some(e.to_string());
                    }
                }
            }
        }

        match last_error {
            Some(error) if added == 0 => {
                warn!(error = %error, "Keyword fallback failed");
                StageOutcome::Failed(error)
            }
            _ => StageOutcome::from_count(added),
        }
    }
}
