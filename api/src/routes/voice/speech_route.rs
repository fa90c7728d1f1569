//! POST /speech: speaks arbitrary text, e.g. an earlier answer.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderValue, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use voice_io::text_to_speech;

use crate::{
    core::app_state::AppState, error_handler::AppResult,
    routes::voice::speech_request::SpeechRequest,
};

/// Handler: POST /speech
///
/// Returns the raw audio with its MIME type rather than the JSON envelope.
pub async fn speech_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SpeechRequest>,
) -> AppResult<Response> {
    let spoken = text_to_speech(&body.text, state.synthesizer.as_ref()).await?;
    let mut res = spoken.bytes.into_response();
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(spoken.mime));
    Ok(res)
}
