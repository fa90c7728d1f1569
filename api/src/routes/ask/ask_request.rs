use base64::{Engine, engine::general_purpose::STANDARD};
use contextor::UsedChunk;
use serde::{Deserialize, Serialize};
use voice_io::SpokenAudio;

/// Request payload for /ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question.
    pub question: String,
    /// Attach a spoken answer; defaults to `SPEAK_ANSWERS`.
    #[serde(default)]
    pub speak: Option<bool>,
}

/// Audio inlined into a JSON response.
#[derive(Debug, Serialize)]
pub struct AudioPayload {
    pub mime: &'static str,
    pub base64: String,
}

impl From<SpokenAudio> for AudioPayload {
    fn from(a: SpokenAudio) -> Self {
        Self {
            mime: a.mime,
            base64: STANDARD.encode(&a.bytes),
        }
    }
}

/// Response payload for /ask and /voice/ask.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// The question as it was answered (recognized text for voice).
    pub question: String,
    pub answer: String,
    /// Chunks given to the model, best first.
    pub context: Vec<UsedChunk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioPayload>,
    /// Set when the answer exists but could not be spoken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_error: Option<String>,
}
