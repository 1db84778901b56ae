//! Memoizing embedding provider
//!
//! Wraps an `EmbeddingBackend` with a bounded LRU cache and a zero-vector
//! fallback, so callers always receive a vector of the configured dimension.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::embedding::backend::EmbeddingBackend;
use crate::errors::{Result, RetrievalError};
use crate::types::{EmbeddingStatus, EmbeddingVector};

/// Default number of memoized embeddings
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// (backend id, exact text)
type CacheKey = (String, String);

/// Embedding provider with bounded memoization
pub struct EmbeddingProvider {
    backend: Arc<dyn EmbeddingBackend>,
    dimension: usize,
    cache: Mutex<LruCache<CacheKey, EmbeddingVector>>,
}

impl EmbeddingProvider {
    /// Create new provider; a capacity of zero is raised to one
    pub fn new(backend: Arc<dyn EmbeddingBackend>, dimension: usize, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            backend,
            dimension,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Embed text, substituting a zero vector when the backend fails
    pub async fn embed(&self, text: &str) -> EmbeddingVector {
        self.embed_with_status(text).await.0
    }

    /// Embed text and report where the vector came from
    pub async fn embed_with_status(&self, text: &str) -> (EmbeddingVector, EmbeddingStatus) {
        if let Some(vector) = self.cached(text) {
            return (vector, EmbeddingStatus::Cached);
        }

        match self.fetch(text).await {
            Ok(vector) => (vector, EmbeddingStatus::Computed),
            Err(e) => {
                warn!(error = %e, backend = self.backend.id(), "Embedding failed, using zero vector");
                (
                    EmbeddingVector::zeros(self.dimension),
                    EmbeddingStatus::Fallback(e.to_string()),
                )
            }
        }
    }

    /// Embed text, surfacing backend failures. Failures are never memoized.
    pub async fn try_embed(&self, text: &str) -> Result<EmbeddingVector> {
        if let Some(vector) = self.cached(text) {
            return Ok(vector);
        }
        self.fetch(text).await
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of memoized vectors
    pub fn cached_len(&self) -> usize {
        self.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    fn key(&self, text: &str) -> CacheKey {
        (self.backend.id().to_string(), text.to_string())
    }

    fn cached(&self, text: &str) -> Option<EmbeddingVector> {
        let hit = self.lock().get(&self.key(text)).cloned();
        if hit.is_some() {
            debug!(chars = text.len(), "Embedding cache hit");
        }
        hit
    }

    async fn fetch(&self, text: &str) -> Result<EmbeddingVector> {
        let values = self
            .backend
            .generate_embedding(text, self.dimension)
            .await?;

        if values.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                actual: values.len(),
            });
        }

        let vector = EmbeddingVector::new(values);
        self.lock().put(self.key(text), vector.clone());
        Ok(vector)
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, EmbeddingVector>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
