//! Text-to-speech for spoken answers.

use std::{future::Future, pin::Pin};

use ai_llm_service::LlmServiceProfiles;
use serde::Serialize;
use tracing::debug;

use crate::error::VoiceError;

/// Boxed future returned by [`SpeechSynthesizer::synthesize`].
pub type SynthesizeFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>, VoiceError>> + Send + 'a>>;

/// Turns text into playable audio bytes.
pub trait SpeechSynthesizer: Send + Sync {
    /// MIME type of the produced audio.
    fn mime(&self) -> &'static str {
        "audio/mpeg"
    }

    fn synthesize<'a>(&'a self, text: &'a str) -> SynthesizeFuture<'a>;
}

impl SpeechSynthesizer for LlmServiceProfiles {
    fn synthesize<'a>(&'a self, text: &'a str) -> SynthesizeFuture<'a> {
        Box::pin(async move { Ok(LlmServiceProfiles::synthesize(self, text).await?) })
    }
}

/// Synthesized audio ready to be played by the client.
#[derive(Debug, Clone, Serialize)]
pub struct SpokenAudio {
    pub mime: &'static str,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Speaks `text` with `synth`.
///
/// # Errors
/// [`VoiceError::EmptyText`] for blank input, or the synthesizer's error.
pub async fn text_to_speech(
    text: &str,
    synth: &dyn SpeechSynthesizer,
) -> Result<SpokenAudio, VoiceError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(VoiceError::EmptyText);
    }
    let bytes = synth.synthesize(text).await?;
    if bytes.is_empty() {
        return Err(VoiceError::Backend("synthesizer returned no audio".into()));
    }
    debug!(chars = text.chars().count(), bytes = bytes.len(), "speech synthesized");
    Ok(SpokenAudio {
        mime: synth.mime(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoSynth;

    impl SpeechSynthesizer for EchoSynth {
        fn synthesize<'a>(&'a self, text: &'a str) -> SynthesizeFuture<'a> {
            Box::pin(async move { Ok(text.as_bytes().to_vec()) })
        }
    }

    #[tokio::test]
    async fn speaks_trimmed_text() {
        let audio = text_to_speech("  hello  ", &EchoSynth).await.unwrap();
        assert_eq!(audio.bytes, b"hello");
        assert_eq!(audio.mime, "audio/mpeg");
    }

    #[tokio::test]
    async fn blank_text_is_rejected() {
        assert!(matches!(
            text_to_speech(" ", &EchoSynth).await,
            Err(VoiceError::EmptyText)
        ));
    }
}
