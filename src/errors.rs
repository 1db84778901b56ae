//! Error types for the retrieval engine
//!
//! Collaborator clients (embedding backend, passage stores, catalog) return
//! these errors. The core components recover from them locally and only
//! report them through typed outcomes.

use thiserror::Error;

/// Main error type for retrieval collaborators
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Non-success response from an external service
    #[error("{service} returned {status}: {message}")]
    Backend {
        service: String,
        status: u16,
        message: String,
    },

    /// Embedding backend returned a vector of the wrong length
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Timeout errors
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic errors with context
    #[error("Retrieval error: {0}")]
    Generic(String),
}

impl RetrievalError {
    /// Build a backend error from a service name, status code and body
    pub fn backend(service: &str, status: u16, message: impl Into<String>) -> Self {
        RetrievalError::Backend {
            service: service.to_string(),
            status,
            message: message.into(),
        }
    }
}

/// Result type alias for retrieval operations
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Convert anyhow errors to RetrievalError
impl From<anyhow::Error> for RetrievalError {
    fn from(err: anyhow::Error) -> Self {
        RetrievalError::Generic(err.to_string())
    }
}
