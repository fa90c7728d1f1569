//! Public API types re-used by external crates (e.g., the HTTP API layer).

use serde::Serialize;

/// A compact record of a context chunk that was fed to the LLM.
///
/// # Example
/// ```
/// use contextor::UsedChunk;
/// let c = UsedChunk {
///     ordinal: 3,
///     distance: 0.42,
///     text: "Brand Space is a design studio.".into(),
/// };
/// assert!(c.distance >= 0.0);
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct UsedChunk {
    pub ordinal: usize,
    pub distance: f32,
    pub text: String,
}

/// Final answer together with the exact context passed to the model.
#[derive(Clone, Debug, Serialize)]
pub struct QaAnswer {
    pub answer: String,
    pub context: Vec<UsedChunk>,
}

/// What an ingestion run produced.
#[derive(Clone, Debug, Serialize)]
pub struct IngestReport {
    pub sources: usize,
    pub pages: usize,
    pub failed_pages: usize,
    pub chars: usize,
    pub chunks: usize,
}
