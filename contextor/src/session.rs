//! Per-user session context.
//!
//! A session starts `Uninitialized`, moves to `Ready` once documents are
//! indexed, and never goes back.

use rag_store::RagStore;
use serde::Serialize;

use crate::history::ExchangeHistory;

#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Ready(RagStore),
}

/// Serializable view of [`SessionState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Uninitialized,
    Ready,
}

/// Everything one user accumulates: the document index and the transcript.
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) state: SessionState,
    pub(crate) history: ExchangeHistory,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        match self.state {
            SessionState::Uninitialized => SessionStatus::Uninitialized,
            SessionState::Ready(_) => SessionStatus::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    /// Number of indexed chunks, zero before ingestion.
    pub fn chunk_count(&self) -> usize {
        match &self.state {
            SessionState::Uninitialized => 0,
            SessionState::Ready(store) => store.len(),
        }
    }

    pub fn history(&self) -> &ExchangeHistory {
        &self.history
    }
}
