//! Core data models used by the library.

use serde::Serialize;

/// One indexed chunk with its vector.
#[derive(Clone, Debug)]
pub struct RagRecord {
    /// Stable id derived from the chunk text and ordinal.
    pub id: String,
    pub ordinal: usize,
    pub text: String,
    pub embedding: Vec<f32>,
}

impl RagRecord {
    pub fn new(ordinal: usize, text: String, embedding: Vec<f32>) -> Self {
        Self {
            id: chunk_id(ordinal, &text),
            ordinal,
            text,
            embedding,
        }
    }
}

/// Query parameters for retrieval.
#[derive(Clone, Copy, Debug)]
pub struct RagQuery<'a> {
    pub text: &'a str,
    pub top_k: usize,
}

/// A single retrieval hit; smaller `distance` means closer.
#[derive(Clone, Debug, Serialize)]
pub struct RagHit {
    pub id: String,
    pub ordinal: usize,
    pub distance: f32,
    pub text: String,
}

/// `blake3(ordinal | text)`, truncated to 16 hex chars.
pub fn chunk_id(ordinal: usize, text: &str) -> String {
    let mut h = blake3::Hasher::new();
    h.update(&(ordinal as u64).to_le_bytes());
    h.update(text.as_bytes());
    h.finalize().to_hex()[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_and_position_aware() {
        assert_eq!(chunk_id(0, "a"), chunk_id(0, "a"));
        assert_ne!(chunk_id(0, "a"), chunk_id(1, "a"));
        assert_eq!(chunk_id(3, "text").len(), 16);
    }
}
