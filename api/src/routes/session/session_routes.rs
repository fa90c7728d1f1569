//! Read-only views of the session: greeting, state and transcript.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use contextor::INTRO_MESSAGE;
use serde::Deserialize;
use tracing::warn;
use voice_io::text_to_speech;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::{
        ask::ask_request::AudioPayload,
        session::session_response::{HistoryResponse, StatusResponse, WelcomeResponse},
    },
};

#[derive(Debug, Default, Deserialize)]
pub struct WelcomeQuery {
    /// Speak the greeting; defaults to `SPEAK_ANSWERS`.
    pub speak: Option<bool>,
}

/// Handler: GET /welcome
///
/// The greeting is always returned; audio is best effort.
pub async fn welcome_route(
    State(state): State<Arc<AppState>>,
    Query(q): Query<WelcomeQuery>,
) -> Response {
    let audio = if q.speak.unwrap_or(state.speak_answers) {
        match text_to_speech(INTRO_MESSAGE, state.synthesizer.as_ref()).await {
            Ok(a) => Some(AudioPayload::from(a)),
            Err(e) => {
                warn!(error = %e, "greeting could not be spoken");
                None
            }
        }
    } else {
        None
    };

    let out = WelcomeResponse {
        message: INTRO_MESSAGE,
        audio,
    };
    ApiResponse::success(out).into_response_with_status(StatusCode::OK)
}

/// Handler: GET /status
pub async fn status_route(State(state): State<Arc<AppState>>) -> Response {
    let session = state.session.lock().await;
    let out = StatusResponse {
        status: session.status(),
        chunks: session.chunk_count(),
        turns: session.history().len(),
    };
    ApiResponse::success(out).into_response_with_status(StatusCode::OK)
}

/// Handler: GET /history
pub async fn history_route(State(state): State<Arc<AppState>>) -> Response {
    let turns = state.session.lock().await.history().turns().to_vec();
    ApiResponse::success(HistoryResponse { turns }).into_response_with_status(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{
        ask::ask_route::answer_question,
        test_support::{Fakes, json_body, ready_state, state},
    };

    #[tokio::test]
    async fn status_moves_from_uninitialized_to_ready() {
        let fakes = Fakes::default();

        let v = json_body(status_route(State(state(&fakes, false))).await).await;
        assert_eq!(v["data"]["status"], "uninitialized");
        assert_eq!(v["data"]["chunks"], 0);

        let v = json_body(status_route(State(ready_state(&fakes, "Hello world.").await)).await).await;
        assert_eq!(v["data"]["status"], "ready");
        assert_eq!(v["data"]["chunks"], 1);
    }

    #[tokio::test]
    async fn history_lists_user_then_assistant() {
        let fakes = Fakes::default();
        let st = ready_state(&fakes, "Hello world.").await;
        answer_question(&st, "What does it say?", false).await.unwrap();

        let v = json_body(history_route(State(st)).await).await;
        let turns = v["data"]["turns"].as_array().unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0]["role"], "user");
        assert_eq!(turns[0]["text"], "What does it say?");
        assert_eq!(turns[1]["role"], "assistant");
    }

    #[tokio::test]
    async fn welcome_can_be_spoken() {
        let st = state(&Fakes::default(), true);
        let v = json_body(welcome_route(State(st), Query(WelcomeQuery::default())).await).await;
        assert_eq!(v["data"]["message"], INTRO_MESSAGE);
        assert_eq!(v["data"]["audio"]["mime"], "audio/mpeg");

        let st = state(&Fakes::default(), true);
        let q = WelcomeQuery { speak: Some(false) };
        let v = json_body(welcome_route(State(st), Query(q)).await).await;
        assert!(v["data"].get("audio").is_none());
    }
}
