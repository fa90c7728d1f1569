use contextor::{SessionStatus, Turn};
use serde::Serialize;

use crate::routes::ask::ask_request::AudioPayload;

/// Response payload for /welcome.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioPayload>,
}

/// Response payload for /status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: SessionStatus,
    pub chunks: usize,
    pub turns: usize,
}

/// Response payload for /history.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub turns: Vec<Turn>,
}
