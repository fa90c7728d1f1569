//! Speech-to-text: capture a phrase and hand it to a recognizer.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmServiceProfiles;
use tracing::{info, warn};

use crate::capture::{AudioSource, ListenOutcome, ListenerConfig, encode_wav, listen};
use crate::error::RecognitionError;

/// Boxed future returned by [`SpeechRecognizer::recognize`].
pub type RecognizeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, RecognitionError>> + Send + 'a>>;

/// Turns a WAV clip into text.
pub trait SpeechRecognizer: Send + Sync {
    fn recognize<'a>(&'a self, wav: Vec<u8>) -> RecognizeFuture<'a>;
}

/// Recognizer backed by the hosted transcription profile.
#[derive(Clone, Debug)]
pub struct HostedRecognizer {
    svc: Arc<LlmServiceProfiles>,
    language: String,
}

impl HostedRecognizer {
    pub fn new(svc: Arc<LlmServiceProfiles>, language: impl Into<String>) -> Self {
        Self {
            svc,
            language: language.into(),
        }
    }
}

impl SpeechRecognizer for HostedRecognizer {
    fn recognize<'a>(&'a self, wav: Vec<u8>) -> RecognizeFuture<'a> {
        Box::pin(async move {
            self.svc
                .transcribe(wav, &self.language)
                .await
                .map_err(|e| RecognitionError::ServiceUnavailable(e.to_string()))
        })
    }
}

/// Listens on `source` and returns the recognized question.
///
/// # Errors
/// [`RecognitionError::NotUnderstood`] when no speech starts before the
/// timeout or the recognizer hears nothing; the recognizer is not called
/// in the first case. [`RecognitionError::ServiceUnavailable`] when the
/// recognizer fails.
pub async fn speech_to_text(
    source: &mut dyn AudioSource,
    cfg: &ListenerConfig,
    recognizer: &dyn SpeechRecognizer,
) -> Result<String, RecognitionError> {
    let phrase = listen(source, cfg).map_err(|outcome| match outcome {
        ListenOutcome::Timeout { waited_secs } => {
            RecognitionError::NotUnderstood(format!("no speech within {waited_secs:.1}s"))
        }
        ListenOutcome::NoAudio => RecognitionError::NotUnderstood("empty recording".into()),
    })?;

    let wav = encode_wav(&phrase)
        .map_err(|e| RecognitionError::NotUnderstood(format!("cannot encode phrase: {e}")))?;

    let text = recognizer.recognize(wav).await.inspect_err(|e| {
        warn!(error = %e, "speech recognition failed");
    })?;
    let text = text.trim();
    if text.is_empty() {
        return Err(RecognitionError::NotUnderstood("nothing recognized".into()));
    }

    info!(chars = text.chars().count(), "speech recognized");
    Ok(text.to_string())
}
