//! Retrieval helpers: flat nearest-neighbour scan and text queries.

use crate::config::DistanceKind;
use crate::embed::EmbeddingsProvider;
use crate::errors::RagError;
use crate::record::{RagHit, RagQuery, RagRecord};

use tracing::trace;

/// Ranks every record against `query_vector` and keeps the `top_k` closest.
///
/// The sort is stable, so equal distances keep insertion order.
///
/// # Errors
/// Returns [`RagError::VectorSizeMismatch`] if the query dimension differs
/// from the stored vectors.
pub fn search_by_vector(
    records: &[RagRecord],
    distance: DistanceKind,
    query_vector: &[f32],
    top_k: usize,
) -> Result<Vec<RagHit>, RagError> {
    trace!("retrieve::search_by_vector records={} top_k={top_k}", records.len());
    if let Some(first) = records.first() {
        if first.embedding.len() != query_vector.len() {
            return Err(RagError::VectorSizeMismatch {
                got: query_vector.len(),
                want: first.embedding.len(),
            });
        }
    }

    let mut scored: Vec<(f32, &RagRecord)> = records
        .iter()
        .map(|r| (distance.distance(&r.embedding, query_vector), r))
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(scored
        .into_iter()
        .take(top_k)
        .map(|(d, r)| RagHit {
            id: r.id.clone(),
            ordinal: r.ordinal,
            distance: d,
            text: r.text.clone(),
        })
        .collect())
}

/// Embeds the query text with `provider` and returns the closest chunks.
///
/// # Errors
/// Returns [`RagError::EmptyQuery`] for blank text, or embedding failures.
pub async fn rag_context(
    records: &[RagRecord],
    distance: DistanceKind,
    query: RagQuery<'_>,
    provider: &dyn EmbeddingsProvider,
) -> Result<Vec<RagHit>, RagError> {
    if query.text.trim().is_empty() {
        return Err(RagError::EmptyQuery);
    }
    trace!("retrieve::rag_context top_k={}", query.top_k);

    let qv = provider.embed(query.text).await?;
    let hits = search_by_vector(records, distance, &qv, query.top_k)?;

    trace!("retrieve::rag_context hits={}", hits.len());
    Ok(hits)
}
