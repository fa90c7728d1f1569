//! POST /voice/ask: recognizes a recorded question, then answers it.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use tracing::{info, warn};
use voice_io::{WavClipSource, speech_to_text};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::{ask::ask_route::answer_question, voice::speech_request::VoiceAskQuery},
};

/// Handler: POST /voice/ask
///
/// The body is the WAV clip recorded by the browser. When nothing intelligible
/// is heard the request fails with `NOT_UNDERSTOOD` and no question is asked.
///
/// # Example
/// ```bash
/// curl -X POST 'http://127.0.0.1:8080/voice/ask?speak=true' \
///   -H 'content-type: audio/wav' --data-binary @question.wav
/// ```
pub async fn voice_ask_route(
    State(state): State<Arc<AppState>>,
    Query(q): Query<VoiceAskQuery>,
    body: Bytes,
) -> AppResult<Response> {
    let mut source = WavClipSource::from_wav_bytes(&body)?;
    let question = speech_to_text(&mut source, &state.listener, state.recognizer.as_ref())
        .await
        .inspect_err(|e| warn!(error = %e, "spoken question not recognized"))?;
    info!(chars = question.chars().count(), "spoken question recognized");

    let speak = q.speak.unwrap_or(state.speak_answers);
    let out = answer_question(&state, &question, speak).await?;
    Ok(ApiResponse::success(out).into_response_with_status(StatusCode::OK))
}
