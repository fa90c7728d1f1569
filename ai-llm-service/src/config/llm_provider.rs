/// Hosted provider behind a model profile.
///
/// Every profile of the backend talks to an OpenAI-compatible REST API.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// fn label(provider: LlmProvider) -> &'static str {
///     match provider {
///         LlmProvider::OpenAI => "openai",
///     }
/// }
/// assert_eq!(label(LlmProvider::OpenAI), "openai");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenAI REST API (or a compatible gateway at a custom base URL).
    OpenAI,
}
