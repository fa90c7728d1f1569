//! Prompt builder: system instructions + compact context block + transcript.

use ai_llm_service::ChatMessage;
use rag_store::RagHit;

use crate::history::{ExchangeHistory, Role};

/// System instructions for document-grounded answers.
pub const DEFAULT_SYSTEM: &str = "\
You are Sakhi, a friendly assistant that answers questions about the user's documents.
Use the context below to answer the latest question. If the context does not contain the answer, \
say that you don't know instead of making one up. Keep answers short and clear.";

/// Instructions for rewriting a follow-up into a standalone search query.
pub const CONDENSE_SYSTEM: &str = "\
Given the conversation so far and a follow-up question, rephrase the follow-up question \
to be a standalone question, in its original language. Reply with the question only.";

/// Renders ranked hits into a labeled block of at most `max_chars` characters.
///
/// Ranking order is preserved; the first hit that does not fit is cut and
/// marked with an ellipsis, later hits are dropped.
pub fn build_context_block(hits: &[RagHit], max_chars: usize) -> String {
    let mut out = String::new();
    let mut budget = max_chars;

    for (i, h) in hits.iter().enumerate() {
        let header = format!("==[{}]== chunk #{}\n", i + 1, h.ordinal);
        let header_len = header.chars().count();
        let text = h.text.trim();
        let text_len = text.chars().count();

        if header_len >= budget {
            break;
        }
        out.push_str(&header);
        budget -= header_len;

        let take = budget.saturating_sub(2);
        if text_len > take {
            out.push_str(safe_truncate(text, take));
            out.push_str("\n…\n");
            break;
        }
        out.push_str(text);
        out.push('\n');
        budget -= text_len + 1;
    }

    out
}

/// Messages for the answer call: system + context, prior turns, then the question.
pub fn build_messages(
    history: &ExchangeHistory,
    question: &str,
    hits: &[RagHit],
    max_ctx_chars: usize,
) -> Vec<ChatMessage> {
    let mut system = String::from(DEFAULT_SYSTEM);
    let context = build_context_block(hits, max_ctx_chars);
    if !context.is_empty() {
        system.push_str("\n\nContext:\n");
        system.push_str(&context);
    }

    let mut msgs = Vec::with_capacity(history.len() + 2);
    msgs.push(ChatMessage::system(system));
    push_transcript(&mut msgs, history);
    msgs.push(ChatMessage::user(question.trim()));
    msgs
}

/// Messages asking the model to turn a follow-up into a standalone question.
pub fn build_condense_messages(history: &ExchangeHistory, question: &str) -> Vec<ChatMessage> {
    let mut transcript = String::new();
    for t in history.turns() {
        let who = match t.role {
            Role::User => "Human",
            Role::Assistant => "Assistant",
        };
        transcript.push_str(&format!("{who}: {}\n", t.text));
    }

    vec![
        ChatMessage::system(CONDENSE_SYSTEM),
        ChatMessage::user(format!(
            "Chat history:\n{transcript}\nFollow-up question: {}",
            question.trim()
        )),
    ]
}

fn push_transcript(msgs: &mut Vec<ChatMessage>, history: &ExchangeHistory) {
    for t in history.turns() {
        msgs.push(match t.role {
            Role::User => ChatMessage::user(t.text.clone()),
            Role::Assistant => ChatMessage::assistant(t.text.clone()),
        });
    }
}

/// First `max` characters of `s`.
fn safe_truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
