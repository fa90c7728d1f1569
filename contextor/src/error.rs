//! Typed error for the contextor crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// A question arrived before any document was ingested.
    #[error("Please upload and process your files first!")]
    NotReady,

    /// Documents were already ingested for this session.
    #[error("documents were already processed for this session")]
    AlreadyIngested,

    /// The question was empty or whitespace only.
    #[error("Please enter a valid question.")]
    EmptyQuestion,

    /// The documents contained no extractable text.
    #[error("the uploaded documents contain no extractable text")]
    NoText,

    /// Errors from PDF extraction or chunking.
    #[error("document error: {0}")]
    Document(#[from] doc_prep::DocPrepError),

    /// Errors from the underlying rag-store crate.
    #[error("RAG error: {0}")]
    Rag(#[from] rag_store::RagError),

    /// The hosted chat model failed.
    #[error("chat error: {0}")]
    Chat(#[from] ai_llm_service::AiLlmError),

    /// A non-hosted chat backend failed.
    #[error("chat backend error: {0}")]
    ChatBackend(String),

    /// Invalid environment-driven configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A blocking worker could not complete.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ContextorError {
    /// State problems the user can fix; reported as warnings, not failures.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::NotReady | Self::AlreadyIngested | Self::EmptyQuestion
        )
    }
}
