//! POST /ask: answers a typed question from the uploaded documents.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::Response};
use tracing::{debug, warn};
use voice_io::text_to_speech;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::ask::ask_request::{AskRequest, AskResponse, AudioPayload},
};

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is Brand Space?","speak":false}'
/// ```
pub async fn ask_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskRequest>,
) -> AppResult<Response> {
    let speak = body.speak.unwrap_or(state.speak_answers);
    let out = answer_question(&state, &body.question, speak).await?;
    Ok(ApiResponse::success(out).into_response_with_status(StatusCode::OK))
}

/// Runs one interaction: ask, then optionally speak the answer.
///
/// The session lock is held for the whole interaction. A failed synthesis
/// does not discard the answer; it is reported in `audio_error`.
pub(crate) async fn answer_question(
    state: &AppState,
    question: &str,
    speak: bool,
) -> AppResult<AskResponse> {
    let mut session = state.session.lock().await;
    let qa = state.orchestrator.ask(&mut session, question).await?;
    debug!(turns = session.history().len(), speak, "answer ready");

    let (audio, audio_error) = if speak {
        match text_to_speech(&qa.answer, state.synthesizer.as_ref()).await {
            Ok(a) => (Some(AudioPayload::from(a)), None),
            Err(e) => {
                warn!(error = %e, "answer could not be spoken");
                (None, Some(e.to_string()))
            }
        }
    } else {
        (None, None)
    };

    Ok(AskResponse {
        question: question.trim().to_string(),
        answer: qa.answer,
        context: qa.context,
        audio,
        audio_error,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use base64::Engine;

    use super::*;
    use crate::routes::test_support::{EchoSynth, Fakes, FixedChat, json_body, ready_state, state};

    fn ask(question: &str, speak: Option<bool>) -> Json<AskRequest> {
        Json(AskRequest {
            question: question.into(),
            speak,
        })
    }

    #[tokio::test]
    async fn answers_with_context_and_records_history() {
        let fakes = Fakes::default();
        let st = ready_state(&fakes, "Hello world.").await;

        let res = ask_route(State(st.clone()), ask("What does it say?", Some(false)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let v = json_body(res).await;
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["answer"], "Brand Space is a design studio.");
        assert_eq!(v["data"]["context"][0]["text"], "Hello world.");
        assert!(v["data"].get("audio").is_none());
        assert_eq!(st.session.lock().await.history().len(), 2);
    }

    #[tokio::test]
    async fn asking_before_upload_is_a_warning() {
        let fakes = Fakes::default();
        let st = state(&fakes, false);

        let Err(err) = ask_route(State(st.clone()), ask("anything?", None)).await else {
            panic!("expected NOT_READY");
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.is_warning());
        assert_eq!(fakes.chat.calls(), 0);
        assert!(st.session.lock().await.history().is_empty());
    }

    #[tokio::test]
    async fn spoken_answer_is_base64_encoded() {
        let fakes = Fakes::default();
        let st = ready_state(&fakes, "Hello world.").await;

        let out = answer_question(&st, "What does it say?", true).await.unwrap();
        let audio = out.audio.unwrap();
        assert_eq!(audio.mime, "audio/mpeg");
        assert_eq!(
            audio.base64,
            base64::engine::general_purpose::STANDARD.encode(out.answer.as_bytes())
        );
        assert!(out.audio_error.is_none());
    }

    #[tokio::test]
    async fn tts_failure_keeps_the_answer() {
        let fakes = Fakes {
            synth: Arc::new(EchoSynth { broken: true }),
            ..Fakes::default()
        };
        let st = ready_state(&fakes, "Hello world.").await;

        let out = answer_question(&st, "What does it say?", true).await.unwrap();
        assert_eq!(out.answer, "Brand Space is a design studio.");
        assert!(out.audio.is_none());
        assert!(out.audio_error.unwrap().contains("tts offline"));
        assert_eq!(st.session.lock().await.history().len(), 2);
    }

    #[tokio::test]
    async fn chat_failure_is_bad_gateway_and_history_is_kept() {
        let fakes = Fakes {
            chat: Arc::new(FixedChat::failing()),
            ..Fakes::default()
        };
        let st = ready_state(&fakes, "Hello world.").await;

        let Err(err) = ask_route(State(st.clone()), ask("What does it say?", None)).await else {
            panic!("expected CHAT_FAILED");
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(st.session.lock().await.history().is_empty());
    }
}
