//! Unified error types for the crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The hosted embedding service failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] AiLlmError),

    /// A non-hosted embedding backend failed.
    #[error("embedding backend error: {0}")]
    Backend(String),

    /// The backend returned a different number of vectors than inputs.
    #[error("embedding count mismatch: got {got}, want {want}")]
    EmbeddingCount { got: usize, want: usize },

    /// Mismatch in vector dimensionality across records.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Nothing to index.
    #[error("no chunks to index")]
    NoChunks,

    /// The query text was blank.
    #[error("query text is empty")]
    EmptyQuery,
}
