//! Hosted embedding provider backed by the shared model service.

use ai_llm_service::LlmServiceProfiles;

use super::{EmbedFuture, EmbeddingsProvider};

impl EmbeddingsProvider for LlmServiceProfiles {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
        Box::pin(async move { Ok(LlmServiceProfiles::embed(self, text).await?) })
    }

    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move { Ok(LlmServiceProfiles::embed_batch(self, texts).await?) })
    }
}
