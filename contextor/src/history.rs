//! Append-only transcript of one session.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One utterance in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Ordered list of turns. Grows only through [`ExchangeHistory::push_exchange`],
/// so user and assistant turns always alternate.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ExchangeHistory {
    turns: Vec<Turn>,
}

impl ExchangeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user turn followed by the assistant reply.
    pub(crate) fn push_exchange(&mut self, question: &str, answer: &str) {
        self.turns.push(Turn {
            role: Role::User,
            text: question.to_string(),
        });
        self.turns.push(Turn {
            role: Role::Assistant,
            text: answer.to_string(),
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_appends_user_then_assistant() {
        let mut h = ExchangeHistory::new();
        h.push_exchange("q", "a");
        assert_eq!(h.len(), 2);
        assert_eq!(h.turns()[0].role, Role::User);
        assert_eq!(h.turns()[1].role, Role::Assistant);
        assert_eq!(h.turns()[1].text, "a");
    }
}
