//! Fixed-size character chunking with overlap.
//!
//! Lengths are measured in Unicode scalar values, never bytes. Each window
//! holds at most `chunk_size` characters and prefers to end right after the
//! last separator it contains; the following window starts exactly
//! `chunk_overlap` characters before the previous one ended.

use serde::Serialize;
use tracing::debug;

use crate::errors::DocPrepError;

/// Chunker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Target window length in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive windows.
    pub chunk_overlap: usize,
    /// Preferred cut point.
    pub separator: String,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separator: "\n".to_string(),
        }
    }
}

impl ChunkerConfig {
    /// Reads `CHUNK_SIZE`, `CHUNK_OVERLAP` and `CHUNK_SEPARATOR`, falling back
    /// to the defaults for unset variables. A literal `\n` in the separator is
    /// read as a newline.
    pub fn from_env() -> Result<Self, DocPrepError> {
        let d = Self::default();
        let cfg = Self {
            chunk_size: env_usize("CHUNK_SIZE", d.chunk_size)?,
            chunk_overlap: env_usize("CHUNK_OVERLAP", d.chunk_overlap)?,
            separator: std::env::var("CHUNK_SEPARATOR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(|s| s.replace("\\n", "\n").replace("\\t", "\t"))
                .unwrap_or(d.separator),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), DocPrepError> {
        if self.chunk_size == 0 {
            return Err(DocPrepError::InvalidConfig("chunk_size must be > 0".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(DocPrepError::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.separator.is_empty() {
            return Err(DocPrepError::InvalidConfig("separator must not be empty".into()));
        }
        Ok(())
    }
}

/// Half-open character range `[start, end)` of one raw window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkSpan {
    pub start: usize,
    pub end: usize,
}

impl ChunkSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One piece of document text, numbered in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub ordinal: usize,
    pub text: String,
}

/// Computes the raw windows over `text`.
///
/// Consecutive spans satisfy `next.start == prev.end - chunk_overlap`, and
/// together they cover every character of `text`.
pub fn split_spans(text: &str, cfg: &ChunkerConfig) -> Result<Vec<ChunkSpan>, DocPrepError> {
    cfg.validate()?;

    let chars: Vec<char> = text.chars().collect();
    let sep: Vec<char> = cfg.separator.chars().collect();
    let n = chars.len();
    let mut spans = Vec::new();
    if n == 0 {
        return Ok(spans);
    }

    let mut start = 0usize;
    let mut prev_end = 0usize;
    loop {
        let end = if n - start <= cfg.chunk_size {
            n
        } else {
            let window_end = start + cfg.chunk_size;
            // A separator cut must move past the previous window and leave room
            // for the overlap, otherwise the next window would not advance.
            let floor = prev_end.max(start + cfg.chunk_overlap);
            last_separator_cut(&chars, &sep, start, window_end)
                .filter(|&cut| cut > floor)
                .unwrap_or(window_end)
        };

        spans.push(ChunkSpan { start, end });
        if end == n {
            break;
        }
        prev_end = end;
        start = end - cfg.chunk_overlap;
    }

    debug!(chars = n, spans = spans.len(), "text split into windows");
    Ok(spans)
}

/// Splits `text` into trimmed, non-blank chunks.
pub fn split_text(text: &str, cfg: &ChunkerConfig) -> Result<Vec<Chunk>, DocPrepError> {
    let spans = split_spans(text, cfg)?;
    let chars: Vec<char> = text.chars().collect();

    let chunks: Vec<Chunk> = spans
        .iter()
        .map(|s| chars[s.start..s.end].iter().collect::<String>())
        .filter_map(|raw| {
            let t = raw.trim();
            (!t.is_empty()).then(|| t.to_string())
        })
        .enumerate()
        .map(|(ordinal, text)| Chunk { ordinal, text })
        .collect();

    debug!(chunks = chunks.len(), "chunks ready");
    Ok(chunks)
}

/// Position right after the last full separator inside `[start, window_end)`.
fn last_separator_cut(chars: &[char], sep: &[char], start: usize, window_end: usize) -> Option<usize> {
    if window_end < start + sep.len() {
        return None;
    }
    (start..=window_end - sep.len())
        .rev()
        .find(|&p| chars[p..p + sep.len()] == *sep)
        .map(|p| p + sep.len())
}

fn env_usize(key: &str, default: usize) -> Result<usize, DocPrepError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => {
            v.trim().parse::<usize>().map_err(|_| DocPrepError::EnvParse {
                key: key.to_string(),
                value: v,
            })
        }
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(size: usize, overlap: usize) -> ChunkerConfig {
        ChunkerConfig {
            chunk_size: size,
            chunk_overlap: overlap,
            separator: "\n".into(),
        }
    }

    fn sample(lines: usize) -> String {
        (0..lines)
            .map(|i| format!("line {i:03} of the sample document body"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn assert_coverage_and_overlap(text: &str, c: &ChunkerConfig) {
        let spans = split_spans(text, c).unwrap();
        let n = text.chars().count();
        assert_eq!(spans.first().unwrap().start, 0);
        assert_eq!(spans.last().unwrap().end, n);
        for s in &spans {
            assert!(s.len() <= c.chunk_size, "span {s:?} too long");
        }
        for w in spans.windows(2) {
            assert_eq!(w[1].start, w[0].end - c.chunk_overlap);
            assert!(w[1].end > w[0].end);
        }
    }

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = split_text("Hello world.", &ChunkerConfig::default()).unwrap();
        assert_eq!(
            chunks,
            vec![Chunk {
                ordinal: 0,
                text: "Hello world.".into()
            }]
        );
    }

    #[test]
    fn trailing_newline_is_trimmed() {
        let chunks = split_text("Hello world.\n", &ChunkerConfig::default()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hello world.");
    }

    #[test]
    fn empty_and_blank_text_yield_nothing() {
        assert!(split_text("", &ChunkerConfig::default()).unwrap().is_empty());
        assert!(split_text(" \n\n ", &ChunkerConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn windows_cover_text_with_exact_overlap() {
        assert_coverage_and_overlap(&sample(200), &ChunkerConfig::default());
        assert_coverage_and_overlap(&sample(50), &cfg(120, 30));
    }

    #[test]
    fn hard_cut_without_separator() {
        let text = "x".repeat(2500);
        let spans = split_spans(&text, &ChunkerConfig::default()).unwrap();
        assert_eq!(
            spans,
            vec![
                ChunkSpan { start: 0, end: 1000 },
                ChunkSpan { start: 800, end: 1800 },
                ChunkSpan { start: 1600, end: 2500 },
            ]
        );
        assert_coverage_and_overlap(&text, &ChunkerConfig::default());
    }

    #[test]
    fn prefers_cut_after_last_separator() {
        // Five 9-char lines joined by newlines, 49 chars.
        let text = "aaaaaaaaa\nbbbbbbbbb\nccccccccc\nddddddddd\neeeeeeeee";
        let spans = split_spans(text, &cfg(25, 5)).unwrap();
        assert_eq!(spans[0], ChunkSpan { start: 0, end: 20 });
        assert_eq!(spans[1].start, 15);
        assert_coverage_and_overlap(text, &cfg(25, 5));
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let text = "é".repeat(30);
        let spans = split_spans(&text, &cfg(10, 2)).unwrap();
        assert_eq!(spans[0], ChunkSpan { start: 0, end: 10 });
        let chunks = split_text(&text, &cfg(10, 2)).unwrap();
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 10));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(split_spans("abc", &cfg(10, 10)).is_err());
        assert!(split_spans("abc", &cfg(0, 0)).is_err());
        let no_sep = ChunkerConfig {
            separator: String::new(),
            ..ChunkerConfig::default()
        };
        assert!(matches!(
            no_sep.validate(),
            Err(DocPrepError::InvalidConfig(_))
        ));
    }

    #[test]
    fn ordinals_are_sequential() {
        let chunks = split_text(&sample(200), &ChunkerConfig::default()).unwrap();
        assert!(chunks.len() > 1);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.ordinal, i);
        }
    }
}
