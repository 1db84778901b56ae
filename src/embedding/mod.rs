//! Query embeddings
//!
//! - Backend: external service producing fixed-dimension vectors
//! - Provider: bounded memoization with zero-vector fallback

pub mod backend;
pub mod openai;
pub mod provider;

pub use backend::EmbeddingBackend;
pub use openai::OpenAiEmbeddingBackend;
pub use provider::{EmbeddingProvider, DEFAULT_CACHE_CAPACITY};
