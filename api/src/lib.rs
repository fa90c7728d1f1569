//! HTTP surface of the assistant.
//!
//! One process serves one session: uploads, questions (typed or spoken) and
//! spoken answers all go through the shared [`AppState`].

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use contextor::IndicatifProgress;
use doc_prep::PdfSource;
use tokio::signal;
use tracing::{error, info, warn};

pub use crate::core::app_state::{AppState, ServerConfig};
pub use crate::error_handler::{AppError, AppResult};

use crate::{
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        ask::ask_route::ask_route,
        documents::upload_documents_route::upload_documents_route,
        health_route::health_route,
        session::session_routes::{history_route, status_route, welcome_route},
        voice::{speech_route::speech_route, voice_ask_route::voice_ask_route},
    },
};

/// Uploads larger than this are rejected before reaching the extractor.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Builds the router over a prepared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_route))
        .route("/welcome", get(welcome_route))
        .route("/status", get(status_route))
        .route("/history", get(history_route))
        .route("/documents", post(upload_documents_route))
        .route("/ask", post(ask_route))
        .route("/voice/ask", post(voice_ask_route))
        .route("/speech", post(speech_route))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Reads configuration, ingests startup PDFs and serves until Ctrl+C.
///
/// # Errors
/// Configuration, startup ingestion, bind or server failures.
pub async fn start() -> AppResult<()> {
    let server = ServerConfig::from_env()?;
    let state = Arc::new(AppState::from_env(&server)?);

    if !server.pdf_paths.is_empty() {
        ingest_startup_pdfs(&state, &server).await?;
    }

    let listener = tokio::net::TcpListener::bind(&server.address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %server.address, speak_answers = server.speak_answers, "api listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("api stopped");
    Ok(())
}

async fn ingest_startup_pdfs(state: &AppState, server: &ServerConfig) -> AppResult<()> {
    let sources: Vec<PdfSource> = server.pdf_paths.iter().map(PdfSource::path).collect();
    info!(files = sources.len(), "processing startup documents");

    let progress = IndicatifProgress::spinner();
    let mut session = state.session.lock().await;
    let report = state
        .orchestrator
        .ingest(&mut session, sources, &progress)
        .await
        .inspect_err(|e| error!(error = %e, "startup ingestion failed"))?;

    info!(
        pages = report.pages,
        failed_pages = report.failed_pages,
        chunks = report.chunks,
        "startup documents ready"
    );
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{Fakes, state};

    #[test]
    fn router_mounts_every_handler() {
        let _app: Router = router(state(&Fakes::default(), false));
    }

    #[tokio::test]
    async fn upload_handler_runs_on_a_spawned_task() {
        let st = state(&Fakes::default(), false);
        let res = tokio::spawn(upload_documents_route(
            axum::extract::State(st),
            axum::http::HeaderMap::new(),
            axum::body::Bytes::from_static(b"not a pdf"),
        ))
        .await
        .unwrap();
        assert!(res.is_err());
    }
}
