//! OpenAI service for chat, embeddings, speech synthesis and transcription.
//!
//! Minimal, non-streaming client around the OpenAI REST API.
//! Endpoints are derived from `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1/chat/completions    : chat completion
//! - POST {endpoint}/v1/embeddings          : embeddings (batched input)
//! - POST {endpoint}/v1/audio/speech        : text-to-speech (MP3 bytes)
//! - POST {endpoint}/v1/audio/transcriptions : speech-to-text (multipart WAV upload)
//!
//! Constructor validation:
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//! - `cfg.model` must not be empty
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::{Response, header, multipart};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, HttpError, ProviderError, ProviderErrorKind, make_snippet,
        validate_range_f32,
    },
};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One entry of the `messages` array sent to `/v1/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Thin client for the OpenAI API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and auth header).
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    base: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `MissingApiKey` or `InvalidEndpoint`
    /// - [`AiLlmError::Config`] for an empty model or out-of-range sampling knobs
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let api_key = cfg.api_key.clone().ok_or_else(|| {
            ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::MissingApiKey)
        })?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                LlmProvider::OpenAI,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        if let Some(t) = cfg.temperature {
            validate_range_f32("temperature", t, 0.0, 2.0)?;
        }
        if let Some(p) = cfg.top_p {
            validate_range_f32("top_p", p, 0.0, 1.0)?;
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        let mut auth =
            header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                ProviderError::new(
                    LlmProvider::OpenAI,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();

        info!(
            provider = ?cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "OpenAiService initialized"
        );

        Ok(Self { client, cfg, base })
    }

    /// Performs a non-streaming chat completion over a full message list.
    ///
    /// Mapped options from config: `model`, `temperature`, `top_p`, `max_tokens`.
    ///
    /// # Errors
    /// - `HttpStatus` for non-2xx responses, `Decode` for malformed JSON
    /// - `EmptyChoices` if no message content is returned
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let url = format!("{}/v1/chat/completions", self.base);
        let body = ChatCompletionRequest {
            model: &self.cfg.model,
            messages,
            temperature: self.cfg.temperature,
            top_p: self.cfg.top_p,
            max_tokens: self.cfg.max_tokens,
        };

        debug!(
            model = %self.cfg.model,
            messages = messages.len(),
            "POST {}", url
        );

        let resp = self.client.post(&url).json(&body).send().await?;
        let resp = self.ensure_success(resp, &url, started).await?;

        let out: ChatCompletionResponse = self.decode(resp, &url, started).await?;
        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or_else(|| {
                ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::EmptyChoices)
            })?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            answer_len = content.len(),
            "chat completion completed"
        );

        Ok(content)
    }

    /// Retrieves embeddings for a batch of inputs via `/v1/embeddings`.
    ///
    /// Output vectors are returned in input order (sorted by the `index`
    /// field of the response).
    ///
    /// # Errors
    /// - `EmptyInput` for an empty batch
    /// - `Decode` if the response length does not match the input
    /// - `HttpStatus` / [`AiLlmError::HttpTransport`] as for [`Self::chat`]
    pub async fn embeddings(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        if inputs.is_empty() {
            return Err(
                ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::EmptyInput).into(),
            );
        }

        let started = Instant::now();
        let url = format!("{}/v1/embeddings", self.base);
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input: inputs,
        };

        debug!(model = %self.cfg.model, batch = inputs.len(), "POST {}", url);

        let resp = self.client.post(&url).json(&body).send().await?;
        let resp = self.ensure_success(resp, &url, started).await?;

        let mut out: EmbeddingsResponse = self.decode(resp, &url, started).await?;
        if out.data.len() != inputs.len() {
            return Err(ProviderError::new(
                LlmProvider::OpenAI,
                ProviderErrorKind::Decode(format!(
                    "expected {} embeddings, got {}",
                    inputs.len(),
                    out.data.len()
                )),
            )
            .into());
        }
        out.data.sort_by_key(|item| item.index);

        info!(
            model = %self.cfg.model,
            batch = inputs.len(),
            latency_ms = started.elapsed().as_millis(),
            "embeddings completed"
        );

        Ok(out.data.into_iter().map(|item| item.embedding).collect())
    }

    /// Synthesizes speech for `text` via `/v1/audio/speech` and returns MP3 bytes.
    ///
    /// # Errors
    /// - `EmptyInput` for blank text
    /// - `HttpStatus` / [`AiLlmError::HttpTransport`] as for [`Self::chat`]
    pub async fn speech(&self, text: &str) -> Result<Vec<u8>, AiLlmError> {
        if text.trim().is_empty() {
            return Err(
                ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::EmptyInput).into(),
            );
        }

        let started = Instant::now();
        let url = format!("{}/v1/audio/speech", self.base);
        let body = SpeechRequest {
            model: &self.cfg.model,
            input: text,
            voice: self.cfg.voice.as_deref().unwrap_or("alloy"),
            response_format: "mp3",
        };

        debug!(model = %self.cfg.model, input_len = text.len(), "POST {}", url);

        let resp = self.client.post(&url).json(&body).send().await?;
        let resp = self.ensure_success(resp, &url, started).await?;
        let audio = resp.bytes().await?.to_vec();

        info!(
            model = %self.cfg.model,
            bytes = audio.len(),
            latency_ms = started.elapsed().as_millis(),
            "speech synthesis completed"
        );

        Ok(audio)
    }

    /// Transcribes a WAV clip via `/v1/audio/transcriptions`.
    ///
    /// Returns the recognized text as-is (possibly empty when nothing was understood).
    ///
    /// # Errors
    /// - `EmptyInput` for an empty clip
    /// - `HttpStatus` / `Decode` / [`AiLlmError::HttpTransport`] as for [`Self::chat`]
    pub async fn transcribe(&self, wav: Vec<u8>, language: &str) -> Result<String, AiLlmError> {
        if wav.is_empty() {
            return Err(
                ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::EmptyInput).into(),
            );
        }

        let started = Instant::now();
        let url = format!("{}/v1/audio/transcriptions", self.base);
        let clip_len = wav.len();
        let part = multipart::Part::bytes(wav)
            .file_name("question.wav")
            .mime_str("audio/wav")?;
        let form = multipart::Form::new()
            .text("model", self.cfg.model.clone())
            .text("language", language.to_string())
            .text("response_format", "json")
            .part("file", part);

        debug!(model = %self.cfg.model, clip_bytes = clip_len, "POST {}", url);

        let resp = self.client.post(&url).multipart(form).send().await?;
        let resp = self.ensure_success(resp, &url, started).await?;
        let out: TranscriptionResponse = self.decode(resp, &url, started).await?;

        info!(
            model = %self.cfg.model,
            text_len = out.text.len(),
            latency_ms = started.elapsed().as_millis(),
            "transcription completed"
        );

        Ok(out.text)
    }

    /// Returns the config this client was built from.
    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    async fn ensure_success(
        &self,
        resp: Response,
        url: &str,
        started: Instant,
    ) -> Result<Response, AiLlmError> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let snippet = make_snippet(&text);

        error!(
            %status,
            %url,
            %snippet,
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "OpenAI returned non-success status"
        );

        Err(ProviderError::new(
            LlmProvider::OpenAI,
            ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet,
            }),
        )
        .into())
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        resp: Response,
        url: &str,
        started: Instant,
    ) -> Result<T, AiLlmError> {
        resp.json::<T>().await.map_err(|e| {
            error!(
                error = %e,
                %url,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "failed to decode OpenAI response"
            );
            ProviderError::new(
                LlmProvider::OpenAI,
                ProviderErrorKind::Decode(format!("serde error: {e}")),
            )
            .into()
        })
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: "gpt-3.5-turbo".into(),
            endpoint: "https://api.openai.com/".into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: Some(0.7),
            top_p: None,
            voice: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn rejects_missing_key() {
        let err = OpenAiService::new(LlmModelConfig {
            api_key: None,
            ..cfg()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::MissingApiKey,
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_endpoint_and_empty_model() {
        assert!(
            OpenAiService::new(LlmModelConfig {
                endpoint: "ftp://x".into(),
                ..cfg()
            })
            .is_err()
        );
        assert!(matches!(
            OpenAiService::new(LlmModelConfig {
                model: " ".into(),
                ..cfg()
            }),
            Err(AiLlmError::Config(ConfigError::EmptyModel))
        ));
    }

    #[test]
    fn trims_trailing_slash_from_base() {
        let svc = OpenAiService::new(cfg()).unwrap();
        assert_eq!(svc.base, "https://api.openai.com");
    }

    #[test]
    fn chat_request_serializes_roles_in_order() {
        let messages = vec![
            ChatMessage::system("ctx"),
            ChatMessage::user("q1"),
            ChatMessage::assistant("a1"),
            ChatMessage::user("q2"),
        ];
        let body = ChatCompletionRequest {
            model: "m",
            messages: &messages,
            temperature: None,
            top_p: None,
            max_tokens: Some(10),
        };
        let json = serde_json::to_value(&body).unwrap();
        let roles: Vec<&str> = json["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, ["system", "user", "assistant", "user"]);
        assert!(json.get("temperature").is_none());
        assert_eq!(json["max_tokens"], 10);
    }

    #[tokio::test]
    async fn empty_inputs_fail_before_network() {
        let svc = OpenAiService::new(cfg()).unwrap();
        assert!(svc.embeddings(&[]).await.is_err());
        assert!(svc.speech("  ").await.is_err());
        assert!(svc.transcribe(Vec::new(), "en").await.is_err());
    }
}
