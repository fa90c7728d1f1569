use ai_llm_service::AiLlmError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contextor::ContextorError;
use doc_prep::DocPrepError;
use rag_store::RagError;
use thiserror::Error;
use voice_io::{RecognitionError, VoiceError};

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Recoverable user-state problem reported as a warning envelope.
    #[error("{message}")]
    Warning {
        status: StatusCode,
        code: &'static str,
        message: String,
    },

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingEnv(_) => StatusCode::INTERNAL_SERVER_ERROR, // startup-only
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,     // startup-only
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,

            // custom mapped
            AppError::Warning { status, .. } | AppError::Http { status, .. } => *status,

            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Warning { code, .. } | AppError::Http { code, .. } => code,
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, AppError::Warning { .. })
    }

    fn http(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        AppError::Http {
            status,
            code,
            message: message.into(),
        }
    }

    fn warning(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        AppError::Warning {
            status,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let envelope = if self.is_warning() {
            ApiResponse::<()>::warning(code, self.to_string())
        } else {
            ApiResponse::<()>::error(code, self.to_string(), Vec::new())
        };
        envelope.into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<AiLlmError> for AppError {
    fn from(err: AiLlmError) -> Self {
        match err {
            AiLlmError::Config(e) => AppError::Config(e.to_string()),
            other => AppError::http(StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", other.to_string()),
        }
    }
}

impl From<DocPrepError> for AppError {
    fn from(err: DocPrepError) -> Self {
        match err {
            DocPrepError::NotPdf { .. } | DocPrepError::Unreadable { .. } => AppError::http(
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_DOCUMENT",
                err.to_string(),
            ),
            DocPrepError::Io { .. } => {
                AppError::http(StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR", err.to_string())
            }
            DocPrepError::EnvParse { .. } | DocPrepError::InvalidConfig(_) => {
                AppError::Config(err.to_string())
            }
        }
    }
}

impl From<RagError> for AppError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::EmptyQuery => AppError::BadRequest(err.to_string()),
            RagError::NoChunks => AppError::http(
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_TEXT",
                err.to_string(),
            ),
            RagError::Config(_) => AppError::Config(err.to_string()),
            RagError::Embedding(_)
            | RagError::Backend(_)
            | RagError::EmbeddingCount { .. }
            | RagError::VectorSizeMismatch { .. } => {
                AppError::http(StatusCode::BAD_GATEWAY, "EMBEDDING_FAILED", err.to_string())
            }
        }
    }
}

impl From<ContextorError> for AppError {
    fn from(err: ContextorError) -> Self {
        match err {
            ContextorError::NotReady => {
                AppError::warning(StatusCode::CONFLICT, "NOT_READY", err.to_string())
            }
            ContextorError::AlreadyIngested => {
                AppError::warning(StatusCode::CONFLICT, "ALREADY_INGESTED", err.to_string())
            }
            ContextorError::EmptyQuestion => {
                AppError::warning(StatusCode::BAD_REQUEST, "EMPTY_QUESTION", err.to_string())
            }
            ContextorError::NoText => AppError::http(
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_TEXT",
                err.to_string(),
            ),
            ContextorError::Document(e) => e.into(),
            ContextorError::Rag(e) => e.into(),
            ContextorError::Chat(_) | ContextorError::ChatBackend(_) => {
                AppError::http(StatusCode::BAD_GATEWAY, "CHAT_FAILED", err.to_string())
            }
            ContextorError::Config(_) => AppError::Config(err.to_string()),
            ContextorError::Internal(_) => {
                AppError::http(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", err.to_string())
            }
        }
    }
}

impl From<RecognitionError> for AppError {
    fn from(err: RecognitionError) -> Self {
        match err {
            RecognitionError::NotUnderstood(_) => AppError::http(
                StatusCode::UNPROCESSABLE_ENTITY,
                "NOT_UNDERSTOOD",
                err.to_string(),
            ),
            RecognitionError::ServiceUnavailable(_) => AppError::http(
                StatusCode::BAD_GATEWAY,
                "RECOGNITION_UNAVAILABLE",
                err.to_string(),
            ),
        }
    }
}

impl From<VoiceError> for AppError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::InvalidAudio(_) | VoiceError::Wav(_) => {
                AppError::http(StatusCode::BAD_REQUEST, "INVALID_AUDIO", err.to_string())
            }
            VoiceError::EmptyText => {
                AppError::http(StatusCode::BAD_REQUEST, "EMPTY_TEXT", err.to_string())
            }
            VoiceError::Synthesis(_) | VoiceError::Backend(_) => {
                AppError::http(StatusCode::BAD_GATEWAY, "TTS_FAILED", err.to_string())
            }
            VoiceError::Config(_) => AppError::Config(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_errors_are_conflict_warnings() {
        let e = AppError::from(ContextorError::NotReady);
        assert_eq!(e.status_code(), StatusCode::CONFLICT);
        assert_eq!(e.error_code(), "NOT_READY");
        assert!(e.is_warning());
        assert_eq!(e.to_string(), "Please upload and process your files first!");

        let e = AppError::from(ContextorError::AlreadyIngested);
        assert_eq!(e.error_code(), "ALREADY_INGESTED");
        assert!(e.is_warning());
    }

    #[test]
    fn not_understood_is_unprocessable() {
        let e = AppError::from(RecognitionError::NotUnderstood("silence".into()));
        assert_eq!(e.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(e.error_code(), "NOT_UNDERSTOOD");
        assert!(!e.is_warning());
    }

    #[test]
    fn nested_document_errors_keep_their_mapping() {
        let e = AppError::from(ContextorError::Document(DocPrepError::NotPdf {
            name: "a.txt".into(),
        }));
        assert_eq!(e.error_code(), "INVALID_DOCUMENT");

        let e = AppError::from(ContextorError::Rag(RagError::Backend("down".into())));
        assert_eq!(e.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(e.error_code(), "EMBEDDING_FAILED");
    }

    #[test]
    fn chat_failure_is_bad_gateway() {
        let e = AppError::from(ContextorError::ChatBackend("timeout".into()));
        assert_eq!(e.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(e.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
