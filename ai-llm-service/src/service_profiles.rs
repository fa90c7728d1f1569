//! Shared model service with four profiles: `chat`, `embedding`, `speech`, `transcription`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Builds one HTTP client per distinct config (endpoint+model+key+timeout).
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{ChatMessage, LlmServiceProfiles};
//! use ai_llm_service::config::default_config::config_openai_profiles;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let svc = Arc::new(LlmServiceProfiles::from_profile_set(config_openai_profiles()?, Some(10))?);
//!
//!     let txt = svc.chat(&[ChatMessage::user("Hello world")]).await?;
//!     println!("CHAT: {}", txt);
//!
//!     let emb = svc.embed("Ferris").await?;
//!     println!("Embedding dim = {}", emb.len());
//!
//!     Ok(())
//! }
//! ```

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{
    config::{
        default_config::ProfileSet, llm_model_config::LlmModelConfig, llm_provider::LlmProvider,
    },
    error_handler::{AiLlmError, ProviderError, ProviderErrorKind},
    health_service::{HealthService, HealthStatus},
    services::open_ai_service::{ChatMessage, OpenAiService},
};

/// Shared service that manages the logical model profiles.
pub struct LlmServiceProfiles {
    chat: LlmModelConfig,
    embedding: LlmModelConfig,
    speech: LlmModelConfig,
    transcription: LlmModelConfig,

    openai: HashMap<ClientKey, Arc<OpenAiService>>,

    health: HealthService,
}

impl std::fmt::Debug for LlmServiceProfiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmServiceProfiles")
            .field("chat", &self.chat.model)
            .field("embedding", &self.embedding.model)
            .field("speech", &self.speech.model)
            .field("transcription", &self.transcription.model)
            .finish()
    }
}

impl LlmServiceProfiles {
    /// Creates a new service, building one client per distinct profile config.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if any profile config is invalid.
    pub fn new(
        chat: LlmModelConfig,
        embedding: LlmModelConfig,
        speech: LlmModelConfig,
        transcription: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        let mut openai = HashMap::new();
        for cfg in [&chat, &embedding, &speech, &transcription] {
            let key = ClientKey::from(cfg);
            if !openai.contains_key(&key) {
                let client = match cfg.provider {
                    LlmProvider::OpenAI => OpenAiService::new(cfg.clone())?,
                };
                openai.insert(key, Arc::new(client));
            }
        }

        Ok(Self {
            chat,
            embedding,
            speech,
            transcription,
            openai,
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Convenience constructor over a [`ProfileSet`] loaded from env.
    pub fn from_profile_set(
        set: ProfileSet,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        Self::new(
            set.chat,
            set.embedding,
            set.speech,
            set.transcription,
            health_timeout_secs,
        )
    }

    /// Runs a chat completion with the **chat** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if generation fails.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AiLlmError> {
        self.client(&self.chat)?.chat(messages).await
    }

    /// Computes one embedding with the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let mut out = self.embed_batch(&[input.to_string()]).await?;
        out.pop().ok_or_else(|| {
            ProviderError::new(
                self.embedding.provider,
                ProviderErrorKind::Decode("empty `data` in embeddings response".into()),
            )
            .into()
        })
    }

    /// Computes embeddings for a batch with the **embedding** profile, in input order.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        self.client(&self.embedding)?.embeddings(inputs).await
    }

    /// Synthesizes MP3 audio with the **speech** profile.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, AiLlmError> {
        self.client(&self.speech)?.speech(text).await
    }

    /// Transcribes a WAV clip with the **transcription** profile.
    pub async fn transcribe(&self, wav: Vec<u8>, language: &str) -> Result<String, AiLlmError> {
        self.client(&self.transcription)?
            .transcribe(wav, language)
            .await
    }

    /// Returns a health snapshot for all distinct profiles.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = Vec::<LlmModelConfig>::with_capacity(4);
        for cfg in [&self.chat, &self.embedding, &self.speech, &self.transcription] {
            if !list.contains(cfg) {
                list.push(cfg.clone());
            }
        }
        self.health.check_many(&list).await
    }

    /// Returns references to the current profiles `(chat, embedding, speech, transcription)`.
    pub fn profiles(
        &self,
    ) -> (
        &LlmModelConfig,
        &LlmModelConfig,
        &LlmModelConfig,
        &LlmModelConfig,
    ) {
        (
            &self.chat,
            &self.embedding,
            &self.speech,
            &self.transcription,
        )
    }

    /* --------------------- Internals --------------------- */

    fn client(&self, cfg: &LlmModelConfig) -> Result<&Arc<OpenAiService>, AiLlmError> {
        self.openai.get(&ClientKey::from(cfg)).ok_or_else(|| {
            ProviderError::new(cfg.provider, ProviderErrorKind::UnknownProfile).into()
        })
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, Eq)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

impl PartialEq for ClientKey {
    fn eq(&self, other: &Self) -> bool {
        self.provider == other.provider
            && self.endpoint == other.endpoint
            && self.model == other.model
            && self.api_key == other.api_key
            && self.timeout == other.timeout
    }
}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider.hash(state);
        self.endpoint.hash(state);
        self.model.hash(state);
        if let Some(ref k) = self.api_key {
            k.hash(state);
        } else {
            0usize.hash(state);
        }
        self.timeout.hash(state);
    }
}
