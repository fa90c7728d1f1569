//! POST /documents: extracts, chunks and indexes uploaded PDFs.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::Response,
};
use contextor::NoopProgress;
use doc_prep::PdfSource;
use tracing::{debug, info};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::documents::upload_documents_request::{UploadBatch, UploadResponse},
};

const DEFAULT_FILE_NAME: &str = "upload.pdf";

/// Handler: POST /documents
///
/// Accepts either one raw PDF (name from the `x-file-name` header) or a
/// JSON [`UploadBatch`] with several base64-encoded PDFs.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/documents \
///   -H 'x-file-name: brand-space.pdf' --data-binary @brand-space.pdf
/// ```
pub async fn upload_documents_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    let sources = sources_from_request(&headers, &body)?;
    debug!(files = sources.len(), bytes = body.len(), "upload received");

    let mut session = state.session.lock().await;
    let report = state
        .orchestrator
        .ingest(&mut session, sources, &NoopProgress)
        .await?;
    info!(
        sources = report.sources,
        pages = report.pages,
        chunks = report.chunks,
        "documents processed"
    );

    let out = UploadResponse {
        message: "Files processed successfully! You can now ask questions.",
        report,
    };
    Ok(ApiResponse::success(out).into_response_with_status(StatusCode::OK))
}

fn sources_from_request(headers: &HeaderMap, body: &Bytes) -> AppResult<Vec<PdfSource>> {
    if body.is_empty() {
        return Err(AppError::BadRequest("empty upload".into()));
    }

    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    if is_json {
        let batch: UploadBatch = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("invalid upload batch: {e}")))?;
        return batch.into_sources();
    }

    let name = headers
        .get("x-file-name")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME);
    Ok(vec![PdfSource::bytes(name, body.to_vec())])
}
