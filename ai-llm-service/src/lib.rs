//! Hosted model client shared by the Sakhi backend.
//!
//! One credential, four logical profiles:
//! - `chat`          → chat completions used to synthesize answers
//! - `embedding`     → embeddings used for chunk indexing and retrieval
//! - `speech`        → text-to-speech
//! - `transcription` → speech-to-text
//!
//! Construct [`service_profiles::LlmServiceProfiles`] once at startup, wrap it
//! in `Arc`, and hand clones to the crates that need it.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, Result};
pub use service_profiles::LlmServiceProfiles;
pub use services::open_ai_service::{ChatMessage, ChatRole};
