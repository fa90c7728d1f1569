//! GET /health: liveness plus hosted provider probes.

use std::sync::Arc;

use ai_llm_service::health_service::HealthStatus;
use axum::{extract::State, http::StatusCode, response::Response};
use contextor::SessionStatus;
use serde::Serialize;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub session: SessionStatus,
    pub providers: Vec<HealthStatus>,
}

/// Handler: GET /health
///
/// Always 200; a failing provider is reported in `providers`, not as an error.
pub async fn health_route(State(state): State<Arc<AppState>>) -> Response {
    let providers = state.health().await;
    let session = state.session.lock().await.status();
    let out = HealthResponse {
        status: "ok",
        session,
        providers,
    };
    ApiResponse::success(out).into_response_with_status(StatusCode::OK)
}
