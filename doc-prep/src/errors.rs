//! Unified error type for the doc-prep crate.

use thiserror::Error;

/// Errors produced while reading PDFs or splitting their text.
#[derive(Debug, Error)]
pub enum DocPrepError {
    // ── Input ───────────────────────────────────────────────────────────────
    /// The source file could not be read.
    #[error("cannot read '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The bytes do not start with a `%PDF-` header.
    #[error("'{name}' is not a PDF document")]
    NotPdf { name: String },

    /// The PDF structure could not be parsed at all.
    #[error("'{name}' is unreadable: {reason}")]
    Unreadable { name: String, reason: String },

    // ── Configuration / environment ─────────────────────────────────────────
    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Chunker settings are inconsistent.
    #[error("invalid chunker configuration: {0}")]
    InvalidConfig(String),
}
