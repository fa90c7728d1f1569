//! Batched embedding executor with bounded concurrency and dimension checks.

use crate::{embed::EmbeddingsProvider, errors::RagError};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

/// Embeds `texts` in batches of `batch_size`, keeping up to `concurrency`
/// requests in flight. Output order matches input order.
///
/// # Errors
/// The first provider error aborts the whole run. Returns
/// [`RagError::EmbeddingCount`] if a batch comes back short and
/// [`RagError::VectorSizeMismatch`] if vectors disagree on dimension.
pub async fn embed_all(
    texts: &[String],
    provider: &dyn EmbeddingsProvider,
    batch_size: usize,
    concurrency: usize,
) -> Result<Vec<Vec<f32>>, RagError> {
    let batch_size = batch_size.max(1);
    info!(
        total = texts.len(),
        batch_size,
        concurrency,
        "embed_pool::embed_all"
    );

    // Batches are owned: the stream future must not borrow from `texts`.
    let owned = texts.chunks(batch_size).map(<[String]>::to_vec);
    let batches: Vec<Vec<Vec<f32>>> = stream::iter(owned)
        .map(|batch: Vec<String>| async move {
            let vectors = provider.embed_batch(&batch).await?;
            if vectors.len() != batch.len() {
                return Err(RagError::EmbeddingCount {
                    got: vectors.len(),
                    want: batch.len(),
                });
            }
            Ok(vectors)
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let vectors: Vec<Vec<f32>> = batches.into_iter().flatten().collect();
    if let Some(first) = vectors.first() {
        let want = first.len();
        if let Some(bad) = vectors.iter().find(|v| v.len() != want) {
            return Err(RagError::VectorSizeMismatch {
                got: bad.len(),
                want,
            });
        }
    }

    debug!(vectors = vectors.len(), "embed_pool::embed_all done");
    Ok(vectors)
}
