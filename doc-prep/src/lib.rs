//! Document preparation: turn PDFs into overlapping text chunks.
//!
//! Two stages, both synchronous and free of network I/O:
//! - [`extract`]  → concatenated page text of one or more PDFs
//! - [`chunking`] → fixed-size character windows with overlap
//!
//! ```no_run
//! use doc_prep::{ChunkerConfig, PdfSource, extract_text, split_text};
//!
//! let text = extract_text(&[PdfSource::path("Brand Space.pdf")])?;
//! let chunks = split_text(&text.text, &ChunkerConfig::default())?;
//! println!("{} chunks", chunks.len());
//! # Ok::<(), doc_prep::DocPrepError>(())
//! ```

pub mod chunking;
pub mod errors;
pub mod extract;

pub use chunking::{Chunk, ChunkSpan, ChunkerConfig, split_spans, split_text};
pub use errors::DocPrepError;
pub use extract::{ExtractedText, PdfSource, extract_pages_text, extract_text};
