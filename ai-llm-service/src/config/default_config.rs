//! Default model configs loaded strictly from environment variables.
//!
//! The credential is read exactly once by [`config_openai_profiles`] and copied
//! into every profile; its absence is a fatal startup error.
//!
//! # Environment variables
//!
//! Common:
//! - `OPENAI_API_KEY`   = credential for all profiles (mandatory)
//! - `OPENAI_BASE_URL`  = API base URL (default `https://api.openai.com`)
//! - `LLM_MAX_TOKENS`   = optional max tokens for chat (u32)
//! - `LLM_TIMEOUT_SECS` = optional request timeout override (u32)
//!
//! Per profile:
//! - `CHAT_MODEL`      (default `gpt-3.5-turbo`)
//! - `EMBEDDING_MODEL` (default `text-embedding-ada-002`)
//! - `TTS_MODEL`       (default `tts-1`), `TTS_VOICE` (default `alloy`)
//! - `STT_MODEL`       (default `whisper-1`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, env_opt_u32, must_env, validate_http_endpoint},
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// The four profiles used by the backend, sharing one credential.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    pub chat: LlmModelConfig,
    pub embedding: LlmModelConfig,
    pub speech: LlmModelConfig,
    pub transcription: LlmModelConfig,
}

/// Builds every profile from the environment.
///
/// # Errors
///
/// - [`crate::error_handler::ConfigError::MissingVar`] if `OPENAI_API_KEY` is absent or empty
/// - [`crate::error_handler::ConfigError::InvalidFormat`] if `OPENAI_BASE_URL` is not http(s)
/// - [`crate::error_handler::ConfigError::InvalidNumber`] for malformed numeric knobs
pub fn config_openai_profiles() -> Result<ProfileSet, AiLlmError> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let endpoint = env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL);
    validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;

    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;
    let timeout_override = env_opt_u32("LLM_TIMEOUT_SECS")?.map(u64::from);

    let base = LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: String::new(),
        endpoint,
        api_key: Some(api_key),
        max_tokens: None,
        temperature: None,
        top_p: None,
        voice: None,
        timeout_secs: None,
    };

    let chat = LlmModelConfig {
        model: env_or("CHAT_MODEL", "gpt-3.5-turbo"),
        max_tokens,
        temperature: Some(0.7),
        timeout_secs: timeout_override.or(Some(120)),
        ..base.clone()
    };

    let embedding = LlmModelConfig {
        model: env_or("EMBEDDING_MODEL", "text-embedding-ada-002"),
        timeout_secs: timeout_override.or(Some(60)),
        ..base.clone()
    };

    let speech = LlmModelConfig {
        model: env_or("TTS_MODEL", "tts-1"),
        voice: Some(env_or("TTS_VOICE", "alloy")),
        timeout_secs: timeout_override.or(Some(60)),
        ..base.clone()
    };

    let transcription = LlmModelConfig {
        model: env_or("STT_MODEL", "whisper-1"),
        timeout_secs: timeout_override.or(Some(60)),
        ..base
    };

    Ok(ProfileSet {
        chat,
        embedding,
        speech,
        transcription,
    })
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
