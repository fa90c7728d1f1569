//! In-memory RAG index: embed document chunks once, retrieve by similarity.
//!
//! This crate provides a small API to:
//! - Build a flat vector index from chunks through an [`EmbeddingsProvider`]
//! - Retrieve the top‑K closest chunks for a textual query
//!
//! The index lives for one session and is never persisted. Queries are embedded
//! by the same provider that built the index.

mod config;
mod embed;
mod embed_pool;
mod errors;
mod record;
mod retrieve;

pub use config::{DistanceKind, RagConfig};
pub use embed::{EmbedFuture, EmbeddingsProvider};
pub use errors::RagError;
pub use record::{RagHit, RagQuery, RagRecord, chunk_id};

use std::sync::Arc;

use doc_prep::Chunk;
use tracing::{debug, info, trace};

/// Flat similarity index over one document set.
///
/// This is the single entry point recommended for application code.
pub struct RagStore {
    cfg: RagConfig,
    provider: Arc<dyn EmbeddingsProvider>,
    records: Vec<RagRecord>,
    dim: usize,
}

impl std::fmt::Debug for RagStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagStore")
            .field("records", &self.records.len())
            .field("dim", &self.dim)
            .field("distance", &self.cfg.distance)
            .finish()
    }
}

impl RagStore {
    /// Embeds every chunk and builds the index.
    ///
    /// Nothing is kept if any embedding call fails.
    ///
    /// # Errors
    /// Returns `RagError::NoChunks` for empty input, config errors, or the first
    /// embedding failure.
    pub async fn build(
        chunks: &[Chunk],
        provider: Arc<dyn EmbeddingsProvider>,
        cfg: RagConfig,
    ) -> Result<Self, RagError> {
        cfg.validate()?;
        if chunks.is_empty() {
            return Err(RagError::NoChunks);
        }
        debug!("RagStore::build chunks={}", chunks.len());

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors =
            embed_pool::embed_all(&texts, provider.as_ref(), cfg.embed_batch, cfg.concurrency)
                .await?;

        let dim = vectors.first().map(Vec::len).unwrap_or_default();
        if dim == 0 {
            return Err(RagError::Backend("provider returned empty vectors".into()));
        }

        let records: Vec<RagRecord> = chunks
            .iter()
            .zip(vectors)
            .map(|(c, v)| RagRecord::new(c.ordinal, c.text.clone(), v))
            .collect();

        info!(
            records = records.len(),
            dim,
            distance = ?cfg.distance,
            "rag index built"
        );
        Ok(Self {
            cfg,
            provider,
            records,
            dim,
        })
    }

    /// Returns the `k` chunks closest to `query`, closest first.
    ///
    /// # Errors
    /// Returns `RagError::EmptyQuery` for blank text or embedding failures.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RagHit>, RagError> {
        trace!("RagStore::retrieve k={k}");
        retrieve::rag_context(
            &self.records,
            self.cfg.distance,
            RagQuery {
                text: query,
                top_k: k,
            },
            self.provider.as_ref(),
        )
        .await
    }

    /// Same as [`RagStore::retrieve`] with the configured `top_k`.
    pub async fn retrieve_default(&self, query: &str) -> Result<Vec<RagHit>, RagError> {
        self.retrieve(query, self.cfg.top_k).await
    }

    /// Performs a low-level search with a ready query vector.
    pub fn search_by_vector(&self, query_vector: &[f32], k: usize) -> Result<Vec<RagHit>, RagError> {
        retrieve::search_by_vector(&self.records, self.cfg.distance, query_vector, k)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Vector dimension shared by all records.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }
}
