use std::{path::PathBuf, sync::Arc};

use ai_llm_service::{
    LlmServiceProfiles, config::default_config::config_openai_profiles,
    health_service::HealthStatus,
};
use contextor::{ContextorConfig, Orchestrator, Session};
use tokio::sync::Mutex;
use voice_io::{HostedRecognizer, ListenerConfig, SpeechRecognizer, SpeechSynthesizer};

use crate::error_handler::AppError;

/// Language hint sent with spoken questions.
const STT_LANGUAGE: &str = "en";

/// Server-level knobs read from the environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// `host:port` to bind.
    pub address: String,
    /// Attach spoken audio to answers unless the request says otherwise.
    pub speak_answers: bool,
    /// PDFs ingested at startup.
    pub pdf_paths: Vec<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let address = std::env::var("API_ADDRESS")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "127.0.0.1:8080".to_string());

        let speak_answers = match std::env::var("SPEAK_ANSWERS") {
            Ok(v) if !v.trim().is_empty() => parse_bool(&v).ok_or_else(|| {
                AppError::Config(format!("SPEAK_ANSWERS must be true/false, got '{v}'"))
            })?,
            _ => true,
        };

        let pdf_paths = std::env::var("PDF_PATHS")
            .map(|v| parse_paths(&v))
            .unwrap_or_default();

        Ok(Self {
            address,
            speak_answers,
            pdf_paths,
        })
    }
}

/// Shared state for all HTTP handlers.
///
/// One session per process; the mutex serializes interactions.
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub session: Mutex<Session>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub listener: ListenerConfig,
    pub speak_answers: bool,
    /// Hosted profiles, absent when running against local fakes.
    pub profiles: Option<Arc<LlmServiceProfiles>>,
}

impl AppState {
    /// State over arbitrary providers, without hosted health probes.
    pub fn new(
        orchestrator: Orchestrator,
        recognizer: Arc<dyn SpeechRecognizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        listener: ListenerConfig,
        speak_answers: bool,
    ) -> Self {
        Self {
            orchestrator,
            session: Mutex::new(Session::new()),
            recognizer,
            synthesizer,
            listener,
            speak_answers,
            profiles: None,
        }
    }

    /// Builds the hosted-provider state from environment variables.
    ///
    /// # Errors
    /// Fails when `OPENAI_API_KEY` is missing or any knob is invalid.
    pub fn from_env(server: &ServerConfig) -> Result<Self, AppError> {
        let profiles = Arc::new(LlmServiceProfiles::from_profile_set(
            config_openai_profiles()?,
            Some(10),
        )?);
        let cfg = ContextorConfig::from_env()?;
        let listener = ListenerConfig::from_env()?;

        let orchestrator = Orchestrator::new(cfg, profiles.clone(), profiles.clone());
        let recognizer = Arc::new(HostedRecognizer::new(profiles.clone(), STT_LANGUAGE));

        Ok(Self {
            orchestrator,
            session: Mutex::new(Session::new()),
            recognizer,
            synthesizer: profiles.clone(),
            listener,
            speak_answers: server.speak_answers,
            profiles: Some(profiles),
        })
    }

    /// Health of every distinct hosted profile; empty without a provider.
    pub async fn health(&self) -> Vec<HealthStatus> {
        match &self.profiles {
            Some(p) => p.health_all().await,
            None => Vec::new(),
        }
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_paths(v: &str) -> Vec<PathBuf> {
    v.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_split_and_trimmed() {
        assert_eq!(
            parse_paths(" Brand Space.pdf, ,docs/b.pdf "),
            vec![PathBuf::from("Brand Space.pdf"), PathBuf::from("docs/b.pdf")]
        );
        assert!(parse_paths("").is_empty());
    }

    #[test]
    fn bools_accept_common_spellings() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
