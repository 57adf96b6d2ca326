//! Error types for reader-md
//!
//! Errors split into two families:
//! - Fatal: authentication failures, pagination/decoding failures, and the
//!   case where every output write fails. These abort the run.
//! - Non-fatal: per-document highlight fetch failures, which degrade that
//!   document to an empty highlight list, and individual write failures,
//!   which are collected and reported at the end of the run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for reader-md operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for reader-md
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing credential. Always fatal.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Network or decoding failure during pagination. Fatal for the run;
    /// carries the page cursor (if any) for diagnostics.
    #[error("fetch failed: {message}{}", .cursor.as_deref().map(|c| format!(" (cursor: {c})")).unwrap_or_default())]
    Fetch {
        /// What went wrong on this page
        message: String,
        /// The cursor of the page that failed, `None` for the first page
        cursor: Option<String>,
    },

    /// Per-document highlight fetch failure. Non-fatal: the document keeps an
    /// empty highlight list and the run continues.
    #[error("highlight fetch failed for document {document_id}: {message}")]
    HighlightFetch {
        /// The document whose detail request failed
        document_id: String,
        /// What went wrong
        message: String,
    },

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api_base")
        key: Option<String>,
    },

    /// Every attempted output write failed
    #[error("all {} output writes failed", .failures.len())]
    AllWritesFailed {
        /// One entry per failed file
        failures: Vec<WriteFailure>,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single failed output write, collected while the remaining files are
/// still attempted
#[derive(Debug, Clone)]
pub struct WriteFailure {
    /// Path that could not be written
    pub path: PathBuf,
    /// The underlying I/O error message
    pub message: String,
}

impl std::fmt::Display for WriteFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}
