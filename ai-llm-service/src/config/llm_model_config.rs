use crate::config::llm_provider::LlmProvider;

/// Configuration for one model profile.
///
/// # Fields
///
/// - `provider`: hosted backend serving the profile.
/// - `model`: model identifier (e.g., `"gpt-3.5-turbo"`, `"text-embedding-ada-002"`).
/// - `endpoint`: base URL of the API (without the `/v1/...` suffix).
/// - `api_key`: credential sent as a Bearer token.
/// - `max_tokens`: maximum number of tokens to generate (chat only).
/// - `temperature`: sampling temperature (chat only).
/// - `top_p`: nucleus sampling cutoff (chat only).
/// - `voice`: synthesis voice (speech only).
/// - `timeout_secs`: optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "gpt-3.5-turbo".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: Some(512),
///     temperature: Some(0.7),
///     top_p: None,
///     voice: None,
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.model, "gpt-3.5-turbo");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The hosted provider.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// API base URL.
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Voice name for speech synthesis.
    pub voice: Option<String>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
