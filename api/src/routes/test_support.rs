//! Canned providers and state builders shared by route tests.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use ai_llm_service::ChatMessage;
use axum::{body::to_bytes, response::Response};
use contextor::{
    ChatFuture, ChatModel, ContextorConfig, ContextorError, NoopProgress, Orchestrator,
};
use rag_store::{EmbedFuture, EmbeddingsProvider};
use voice_io::{
    ListenerConfig, Phrase, RecognitionError, RecognizeFuture, SpeechRecognizer,
    SpeechSynthesizer, SynthesizeFuture, VoiceError, capture::encode_wav,
};

use crate::core::app_state::AppState;

pub(crate) const RATE: u32 = 16_000;

/// Letter-frequency vectors: texts sharing letters land close together.
pub(crate) struct LetterEmbedder;

impl EmbeddingsProvider for LetterEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
        Box::pin(async move {
            let mut v = vec![0.0f32; 26];
            for c in text.to_lowercase().chars() {
                if c.is_ascii_lowercase() {
                    v[(c as u8 - b'a') as usize] += 1.0;
                }
            }
            Ok(v)
        })
    }
}

/// Replies with a fixed answer, or fails every call.
pub(crate) struct FixedChat {
    pub reply: Option<&'static str>,
    pub calls: AtomicUsize,
}

impl FixedChat {
    pub fn answering(reply: &'static str) -> Self {
        Self {
            reply: Some(reply),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ChatModel for FixedChat {
    fn chat<'a>(&'a self, _messages: &'a [ChatMessage]) -> ChatFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .ok_or_else(|| ContextorError::ChatBackend("model offline".into()))
        })
    }
}

/// Recognizer returning a canned transcript, counting calls.
pub(crate) struct CannedRecognizer {
    pub text: Result<&'static str, &'static str>,
    pub calls: AtomicUsize,
}

impl CannedRecognizer {
    pub fn hearing(text: &'static str) -> Self {
        Self {
            text: Ok(text),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SpeechRecognizer for CannedRecognizer {
    fn recognize<'a>(&'a self, _wav: Vec<u8>) -> RecognizeFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.text
                .map(str::to_string)
                .map_err(|e| RecognitionError::ServiceUnavailable(e.to_string()))
        })
    }
}

/// Synthesizer that "speaks" the text as its UTF-8 bytes.
pub(crate) struct EchoSynth {
    pub broken: bool,
}

impl SpeechSynthesizer for EchoSynth {
    fn synthesize<'a>(&'a self, text: &'a str) -> SynthesizeFuture<'a> {
        Box::pin(async move {
            if self.broken {
                Err(VoiceError::Backend("tts offline".into()))
            } else {
                Ok(text.as_bytes().to_vec())
            }
        })
    }
}

pub(crate) struct Fakes {
    pub chat: Arc<FixedChat>,
    pub recognizer: Arc<CannedRecognizer>,
    pub synth: Arc<EchoSynth>,
}

impl Default for Fakes {
    fn default() -> Self {
        Self {
            chat: Arc::new(FixedChat::answering("Brand Space is a design studio.")),
            recognizer: Arc::new(CannedRecognizer::hearing("What is Brand Space?")),
            synth: Arc::new(EchoSynth { broken: false }),
        }
    }
}

pub(crate) fn state(fakes: &Fakes, speak_answers: bool) -> Arc<AppState> {
    let orchestrator = Orchestrator::new(
        ContextorConfig::default(),
        Arc::new(LetterEmbedder),
        fakes.chat.clone(),
    );
    Arc::new(AppState::new(
        orchestrator,
        fakes.recognizer.clone(),
        fakes.synth.clone(),
        ListenerConfig::default(),
        speak_answers,
    ))
}

/// State whose session already indexed `text`.
pub(crate) async fn ready_state(fakes: &Fakes, text: &str) -> Arc<AppState> {
    let st = state(fakes, false);
    {
        let mut session = st.session.lock().await;
        st.orchestrator
            .ingest_text(&mut session, text, &NoopProgress)
            .await
            .unwrap();
    }
    st
}

pub(crate) fn wav(samples: Vec<i16>) -> Vec<u8> {
    encode_wav(&Phrase {
        samples,
        sample_rate: RATE,
    })
    .unwrap()
}

pub(crate) fn silence(secs: f32) -> Vec<i16> {
    vec![0; (RATE as f32 * secs) as usize]
}

pub(crate) fn tone(secs: f32) -> Vec<i16> {
    (0..(RATE as f32 * secs) as usize)
        .map(|i| if i % 2 == 0 { 3000 } else { -3000 })
        .collect()
}

pub(crate) async fn json_body(res: Response) -> serde_json::Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
