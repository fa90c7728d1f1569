use serde::Deserialize;

/// Request payload for /speech.
#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

/// Query for /voice/ask.
#[derive(Debug, Default, Deserialize)]
pub struct VoiceAskQuery {
    /// Speak the answer; defaults to `SPEAK_ANSWERS`.
    pub speak: Option<bool>,
}
