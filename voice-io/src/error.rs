//! Typed errors for the voice adapter.

use thiserror::Error;

/// Why a spoken question produced no text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    /// No speech before the timeout, or nothing intelligible in it.
    #[error("Could not understand the audio. Please try again. ({0})")]
    NotUnderstood(String),

    /// The recognition service could not be reached or failed.
    #[error("Error with the speech recognition service: {0}")]
    ServiceUnavailable(String),
}

/// Audio decoding, synthesis and configuration failures.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// Uploaded audio is not a usable WAV clip.
    #[error("invalid audio: {0}")]
    InvalidAudio(String),

    /// WAV encoding/decoding error.
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    /// Nothing to speak.
    #[error("text to speak is empty")]
    EmptyText,

    /// The hosted speech service failed.
    #[error("speech synthesis error: {0}")]
    Synthesis(#[from] ai_llm_service::AiLlmError),

    /// A non-hosted synthesizer failed.
    #[error("speech backend error: {0}")]
    Backend(String),

    /// Invalid environment-driven configuration.
    #[error("config error: {0}")]
    Config(String),
}
