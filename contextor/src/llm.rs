//! Chat model seam used by the orchestrator.

use std::{future::Future, pin::Pin};

use ai_llm_service::{ChatMessage, LlmServiceProfiles};

use crate::error::ContextorError;

/// Boxed future returned by [`ChatModel::chat`].
pub type ChatFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>>;

/// Produces one assistant reply for an ordered message list.
///
/// Implemented for the hosted service profiles; tests plug in canned models.
pub trait ChatModel: Send + Sync {
    fn chat<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatFuture<'a>;
}

impl ChatModel for LlmServiceProfiles {
    fn chat<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatFuture<'a> {
        Box::pin(async move { Ok(LlmServiceProfiles::chat(self, messages).await?) })
    }
}
