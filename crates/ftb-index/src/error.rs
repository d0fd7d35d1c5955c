//! Error types for the ftb-index crate.

use std::io;

use thiserror::Error;

use crate::DocId;

/// Errors reported by index, record and corpus collaborators.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Reading a posting list failed.
    #[error("failed to read postings for '{term}': {message}")]
    Read {
        /// Term whose postings were being read.
        term: String,
        /// Error message.
        message: String,
    },

    /// Fetching a record failed.
    #[error("failed to fetch record {doc}: {message}")]
    Fetch {
        /// Document that was being fetched.
        doc: DocId,
        /// Error message.
        message: String,
    },

    /// A corpus file could not be decoded.
    #[error("invalid corpus: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl IndexError {
    /// Creates a `Read` error for a term.
    pub fn read(term: &str, message: impl Into<String>) -> Self {
        Self::Read {
            term: term.to_string(),
            message: message.into(),
        }
    }

    /// Creates a `Fetch` error for a document.
    pub fn fetch(doc: DocId, message: impl Into<String>) -> Self {
        Self::Fetch {
            doc,
            message: message.into(),
        }
    }
}
