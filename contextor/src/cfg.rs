//! Runtime configuration loaded from environment variables.

use doc_prep::ChunkerConfig;
use rag_store::RagConfig;

use crate::error::ContextorError;

/// Config bag for the orchestrator. All fields have defaults via `from_env`.
#[derive(Clone, Debug)]
pub struct ContextorConfig {
    /// Chunk length, overlap and separator.
    pub chunker: ChunkerConfig,
    /// Index distance, top-k and embedding batching.
    pub rag: RagConfig,
    /// Character budget of the context block in the system message.
    pub max_ctx_chars: usize,
    /// Rewrite follow-up questions into standalone queries before retrieval.
    pub condense_questions: bool,
}

impl Default for ContextorConfig {
    fn default() -> Self {
        Self {
            chunker: ChunkerConfig::default(),
            rag: RagConfig::default(),
            max_ctx_chars: 12_000,
            condense_questions: true,
        }
    }
}

impl ContextorConfig {
    /// Build from environment variables with sensible defaults.
    ///
    /// # Errors
    /// Returns `ContextorError::Document`/`Rag` for invalid chunker or index
    /// settings and `ContextorError::Config` for unparsable local knobs.
    pub fn from_env() -> Result<Self, ContextorError> {
        let d = Self::default();
        Ok(Self {
            chunker: ChunkerConfig::from_env()?,
            rag: RagConfig::from_env()?,
            max_ctx_chars: parse("MAX_CTX_CHARS", d.max_ctx_chars)?,
            condense_questions: parse("CONDENSE_QUESTIONS", d.condense_questions)?,
        })
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> Result<T, ContextorError> {
    match std::env::var(k) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map_err(|_| ContextorError::Config(format!("{k} has invalid value '{v}'"))),
        _ => Ok(dflt),
    }
}
