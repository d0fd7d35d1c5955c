//! Error types for the ftb-search crate.

use ftb_index::{DocId, IndexError};
use ftb_query::QueryError;
use thiserror::Error;

/// Errors raised while preparing or running a boolean search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query could not be parsed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Search state could not be allocated.
    #[error("out of memory while preparing the search")]
    Allocation,

    /// Reading a posting list failed.
    #[error("failed to read postings for '{term}'")]
    IndexRead {
        /// Term whose cursor failed.
        term: String,
        /// Underlying index error.
        #[source]
        source: IndexError,
    },

    /// Fetching a candidate record failed.
    #[error("failed to fetch record {doc}")]
    RecordFetch {
        /// Document being fetched.
        doc: DocId,
        /// Underlying index error.
        #[source]
        source: IndexError,
    },

    /// The search was closed.
    #[error("search is closed")]
    Closed,
}
