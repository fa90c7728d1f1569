//! Conversation orchestration over a per-session RAG index.
//!
//! Public API: [`Orchestrator`] with [`Orchestrator::ingest`] and
//! [`Orchestrator::ask`], both operating on an explicit [`Session`].
//!
//! Ingestion extracts PDF text, splits it into overlapping chunks and embeds
//! them into a flat index. Asking retrieves the closest chunks, builds a
//! prompt with the running transcript, calls the chat model, and records the
//! exchange only when the model answered.

mod api_types;
mod cfg;
mod error;
mod history;
mod llm;
mod progress;
mod session;

pub mod prompt;

pub use api_types::{IngestReport, QaAnswer, UsedChunk};
pub use cfg::ContextorConfig;
pub use error::ContextorError;
pub use history::{ExchangeHistory, Role, Turn};
pub use llm::{ChatFuture, ChatModel};
pub use progress::{IndicatifProgress, NoopProgress, Progress};
pub use session::{Session, SessionState, SessionStatus};

use std::sync::Arc;

use doc_prep::{PdfSource, extract_text, split_text};
use rag_store::{EmbeddingsProvider, RagStore};
use tracing::{debug, info, warn};

/// Greeting shown (and optionally spoken) when a user opens the assistant.
pub const INTRO_MESSAGE: &str = "Hello, I am your Sakhi Chatbot. Please upload your PDF documents \
and start asking questions. I will do my best to answer your questions based on the document content.";

/// Wires the embedding provider, the chat model and the runtime knobs.
///
/// Holds no per-user state; everything mutable lives in [`Session`].
pub struct Orchestrator {
    cfg: ContextorConfig,
    embedder: Arc<dyn EmbeddingsProvider>,
    chat: Arc<dyn ChatModel>,
}

impl Orchestrator {
    pub fn new(
        cfg: ContextorConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
        chat: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            cfg,
            embedder,
            chat,
        }
    }

    pub fn config(&self) -> &ContextorConfig {
        &self.cfg
    }

    /// Extracts, chunks and indexes `sources`, moving the session to `Ready`.
    ///
    /// # Errors
    /// `AlreadyIngested` if the session is ready already; document, embedding
    /// or empty-text errors otherwise. The session is unchanged on any error.
    pub async fn ingest(
        &self,
        session: &mut Session,
        sources: Vec<PdfSource>,
        prog: &dyn Progress,
    ) -> Result<IngestReport, ContextorError> {
        if session.is_ready() {
            warn!("ingest rejected: documents already processed");
            return Err(ContextorError::AlreadyIngested);
        }

        prog.set_total(3);
        prog.step("extracting text");
        let n_sources = sources.len();
        let extracted = tokio::task::spawn_blocking(move || extract_text(&sources))
            .await
            .map_err(|e| ContextorError::Internal(e.to_string()))??;

        let mut report = self.ingest_text(session, &extracted.text, prog).await?;
        report.sources = n_sources;
        report.pages = extracted.pages;
        report.failed_pages = extracted.failed_pages;
        prog.finish("Files processed successfully! You can now ask questions.");
        Ok(report)
    }

    /// Chunks and indexes already extracted `text`.
    ///
    /// # Errors
    /// Same as [`Orchestrator::ingest`] minus the PDF errors.
    pub async fn ingest_text(
        &self,
        session: &mut Session,
        text: &str,
        prog: &dyn Progress,
    ) -> Result<IngestReport, ContextorError> {
        if session.is_ready() {
            return Err(ContextorError::AlreadyIngested);
        }

        prog.step("splitting text into chunks");
        let chunks = split_text(text, &self.cfg.chunker)?;
        if chunks.is_empty() {
            warn!("ingest produced no chunks");
            return Err(ContextorError::NoText);
        }

        prog.step("embedding chunks");
        let store = RagStore::build(&chunks, self.embedder.clone(), self.cfg.rag.clone()).await?;

        let report = IngestReport {
            sources: 0,
            pages: 0,
            failed_pages: 0,
            chars: text.chars().count(),
            chunks: store.len(),
        };
        session.state = SessionState::Ready(store);
        info!(chunks = report.chunks, chars = report.chars, "session ready");
        Ok(report)
    }

    /// Answers `question` from the indexed documents and the transcript.
    ///
    /// Surrounding whitespace is stripped from `question`; the stripped text
    /// is what the model sees and what the user turn records.
    ///
    /// # Errors
    /// `EmptyQuestion` and `NotReady` are warnings; retrieval and chat failures
    /// are returned as-is. History only changes when an answer is returned.
    pub async fn ask(
        &self,
        session: &mut Session,
        question: &str,
    ) -> Result<QaAnswer, ContextorError> {
        let question = question.trim();
        if question.is_empty() {
            warn!("ask rejected: empty question");
            return Err(ContextorError::EmptyQuestion);
        }
        let store = match &session.state {
            SessionState::Uninitialized => {
                warn!("ask rejected: no documents processed yet");
                return Err(ContextorError::NotReady);
            }
            SessionState::Ready(store) => store,
        };

        let query = self.standalone_question(&session.history, question).await?;
        let hits = store.retrieve(&query, self.cfg.rag.top_k).await?;
        debug!(hits = hits.len(), query = %query, "context retrieved");

        let messages =
            prompt::build_messages(&session.history, question, &hits, self.cfg.max_ctx_chars);
        let answer = self.chat.chat(&messages).await?;

        session.history.push_exchange(question, &answer);
        info!(
            turns = session.history.len(),
            context = hits.len(),
            "question answered"
        );

        let context = hits
            .into_iter()
            .map(|h| UsedChunk {
                ordinal: h.ordinal,
                distance: h.distance,
                text: h.text,
            })
            .collect();
        Ok(QaAnswer { answer, context })
    }

    /// Rewrites a follow-up into a self-contained query when there is a transcript.
    async fn standalone_question(
        &self,
        history: &ExchangeHistory,
        question: &str,
    ) -> Result<String, ContextorError> {
        if !self.cfg.condense_questions || history.is_empty() {
            return Ok(question.to_string());
        }
        let msgs = prompt::build_condense_messages(history, question);
        let rewritten = self.chat.chat(&msgs).await?;
        let rewritten = rewritten.trim();
        Ok(if rewritten.is_empty() {
            question.to_string()
        } else {
            rewritten.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::{ChatMessage, ChatRole};
    use rag_store::{EmbedFuture, RagError};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct LetterEmbedder;

    impl EmbeddingsProvider for LetterEmbedder {
        fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
            Box::pin(async move {
                let mut v = vec![0.0f32; 26];
                for c in text.to_lowercase().chars() {
                    if c.is_ascii_lowercase() {
                        v[(c as u8 - b'a') as usize] += 1.0;
                    }
                }
                Ok(v)
            })
        }
    }

    struct FailingEmbedder;

    impl EmbeddingsProvider for FailingEmbedder {
        fn embed<'a>(&'a self, _text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
            Box::pin(async { Err(RagError::Backend("quota exceeded".into())) })
        }
    }

    /// Pops scripted replies; answers "ok" once the script runs out.
    #[derive(Default)]
    struct ScriptedChat {
        replies: Mutex<VecDeque<Result<String, String>>>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedChat {
        fn with(replies: Vec<Result<&str, &str>>) -> Self {
            let replies = replies
                .into_iter()
                .map(|r| r.map(str::to_string).map_err(str::to_string))
                .collect();
            Self {
                replies: Mutex::new(replies),
                calls: Mutex::default(),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl ChatModel for ScriptedChat {
        fn chat<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatFuture<'a> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(messages.to_vec());
                match self.replies.lock().unwrap().pop_front() {
                    Some(Ok(s)) => Ok(s),
                    Some(Err(e)) => Err(ContextorError::ChatBackend(e)),
                    None => Ok("ok".to_string()),
                }
            })
        }
    }

    fn orchestrator(chat: Arc<ScriptedChat>) -> Orchestrator {
        Orchestrator::new(ContextorConfig::default(), Arc::new(LetterEmbedder), chat)
    }

    async fn ready_session(orc: &Orchestrator, text: &str) -> Session {
        let mut s = Session::new();
        orc.ingest_text(&mut s, text, &NoopProgress).await.unwrap();
        s
    }

    #[tokio::test]
    async fn ask_before_ingest_is_not_ready_and_keeps_history() {
        let chat = Arc::new(ScriptedChat::default());
        let orc = orchestrator(chat.clone());
        let mut s = Session::new();

        let err = orc.ask(&mut s, "What is this?").await.unwrap_err();
        assert!(matches!(err, ContextorError::NotReady));
        assert!(err.is_warning());
        assert!(s.history().is_empty());
        assert_eq!(chat.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_question_is_rejected() {
        let chat = Arc::new(ScriptedChat::default());
        let orc = orchestrator(chat.clone());
        let mut s = ready_session(&orc, "Hello world.").await;

        let err = orc.ask(&mut s, "  \n ").await.unwrap_err();
        assert!(matches!(err, ContextorError::EmptyQuestion));
        assert!(s.history().is_empty());
        assert_eq!(chat.call_count(), 0);
    }

    #[tokio::test]
    async fn success_appends_user_then_assistant() {
        let chat = Arc::new(ScriptedChat::with(vec![Ok("It says hello.")]));
        let orc = orchestrator(chat.clone());
        let mut s = ready_session(&orc, "Hello world.").await;

        let qa = orc.ask(&mut s, "What does it say?").await.unwrap();
        assert_eq!(qa.answer, "It says hello.");
        assert_eq!(qa.context.len(), 1);
        assert_eq!(qa.context[0].text, "Hello world.");

        let turns = s.history().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn { role: Role::User, text: "What does it say?".into() });
        assert_eq!(turns[1], Turn { role: Role::Assistant, text: "It says hello.".into() });

        let sent = &chat.calls.lock().unwrap()[0];
        assert_eq!(sent[0].role, ChatRole::System);
        assert!(sent[0].content.contains("Hello world."));
        assert_eq!(sent.last().unwrap().content, "What does it say?");
    }

    #[tokio::test]
    async fn chat_failure_leaves_history_unchanged() {
        let chat = Arc::new(ScriptedChat::with(vec![Ok("first"), Err("upstream 500")]));
        let orc = Orchestrator::new(
            ContextorConfig {
                condense_questions: false,
                ..ContextorConfig::default()
            },
            Arc::new(LetterEmbedder),
            chat.clone(),
        );
        let mut s = ready_session(&orc, "Hello world.").await;

        orc.ask(&mut s, "one").await.unwrap();
        let before = s.history().len();
        let err = orc.ask(&mut s, "two").await.unwrap_err();
        assert!(matches!(err, ContextorError::ChatBackend(_)));
        assert!(!err.is_warning());
        assert_eq!(s.history().len(), before);
        // No retries.
        assert_eq!(chat.call_count(), 2);
    }

    #[tokio::test]
    async fn repeated_question_grows_history_the_same_way() {
        let chat = Arc::new(ScriptedChat::default());
        let orc = orchestrator(chat.clone());
        let mut s = ready_session(&orc, "Hello world.").await;

        orc.ask(&mut s, "Same?").await.unwrap();
        assert_eq!(s.history().len(), 2);
        orc.ask(&mut s, "Same?").await.unwrap();
        assert_eq!(s.history().len(), 4);
        assert_eq!(s.history().turns()[0], s.history().turns()[2]);

        // Second ask carries the first exchange in its prompt.
        let calls = chat.calls.lock().unwrap();
        let last = calls.last().unwrap();
        assert_eq!(last.len(), 4);
        assert_eq!(last[1].role, ChatRole::User);
        assert_eq!(last[2].role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn follow_up_is_condensed_before_retrieval() {
        let chat = Arc::new(ScriptedChat::with(vec![
            Ok("first answer"),
            Ok("What is the zebra price?"),
            Ok("second answer"),
        ]));
        let orc = orchestrator(chat.clone());
        let mut s = ready_session(&orc, "alpha\nzebra price list").await;

        orc.ask(&mut s, "hello?").await.unwrap();
        let qa = orc.ask(&mut s, "and that one?").await.unwrap();
        assert_eq!(qa.answer, "second answer");
        assert_eq!(chat.call_count(), 3);
        // The transcript keeps the user's own wording.
        assert_eq!(s.history().turns()[2].text, "and that one?");
    }

    #[tokio::test]
    async fn second_ingest_is_rejected() {
        let orc = orchestrator(Arc::new(ScriptedChat::default()));
        let mut s = ready_session(&orc, "Hello world.").await;
        let err = orc
            .ingest_text(&mut s, "More text.", &NoopProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, ContextorError::AlreadyIngested));
        assert_eq!(s.chunk_count(), 1);
    }

    #[tokio::test]
    async fn failed_ingest_keeps_session_uninitialized() {
        let orc = Orchestrator::new(
            ContextorConfig::default(),
            Arc::new(FailingEmbedder),
            Arc::new(ScriptedChat::default()),
        );
        let mut s = Session::new();
        let err = orc
            .ingest_text(&mut s, "Hello world.", &NoopProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, ContextorError::Rag(_)));
        assert_eq!(s.status(), SessionStatus::Uninitialized);

        let err = orc
            .ingest(
                &mut s,
                vec![PdfSource::bytes("notes.txt", b"plain text".to_vec())],
                &NoopProgress,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContextorError::Document(_)));
        assert!(!s.is_ready());
    }

    #[tokio::test]
    async fn blank_document_text_is_rejected() {
        let orc = orchestrator(Arc::new(ScriptedChat::default()));
        let mut s = Session::new();
        let err = orc.ingest_text(&mut s, "   \n  ", &NoopProgress).await.unwrap_err();
        assert!(matches!(err, ContextorError::NoText));
    }

    #[tokio::test]
    async fn pipeline_runs_on_spawned_tasks() {
        let orc = Arc::new(orchestrator(Arc::new(ScriptedChat::with(vec![Ok("It greets.")]))));
        let o = orc.clone();
        let session = tokio::spawn(async move {
            let mut s = Session::new();
            o.ingest_text(&mut s, "Hello world.", &NoopProgress)
                .await
                .unwrap();
            let err = o
                .ingest(
                    &mut s,
                    vec![PdfSource::bytes("again.pdf", b"%PDF-1.5".to_vec())],
                    &NoopProgress,
                )
                .await
                .unwrap_err();
            assert!(matches!(err, ContextorError::AlreadyIngested));
            let qa = o.ask(&mut s, "What does it say?").await.unwrap();
            assert_eq!(qa.answer, "It greets.");
            s
        })
        .await
        .unwrap();
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn user_turn_records_the_stripped_question() {
        let orc = orchestrator(Arc::new(ScriptedChat::with(vec![Ok("Hi.")])));
        let mut s = ready_session(&orc, "Hello world.").await;
        orc.ask(&mut s, "  What does it say?\n").await.unwrap();
        let turns = s.history().turns();
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].text, "What does it say?");
        assert_eq!(turns[1].text, "Hi.");
    }
}
