//! Embedding backend trait

use async_trait::async_trait;

use crate::errors::Result;

/// External service that turns text into a vector
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Stable identifier of this backend handle (model, endpoint, dimension).
    /// Memoized vectors are keyed by it so two backends never share entries.
    fn id(&self) -> &str;

    /// Generate an embedding of exactly `dimension` floats
    async fn generate_embedding(&self, text: &str, dimension: usize) -> Result<Vec<f32>>;
}
