//! Word index, record and tokenizer collaborators for the ftb boolean engine.
//!
//! This crate defines the contracts the search engine depends on, and simple
//! implementations of each:
//! - [`Tokenizer`] splits text into folded words ([`SimpleTokenizer`])
//! - [`Index`] opens forward-only posting cursors ([`MemoryIndex`])
//! - [`RecordSource`] fetches stored records by id ([`MemoryIndex`])
//! - [`Corpus`] loads and saves record sets as JSON
//!
//! # Example
//!
//! ```
//! use ftb_index::{Index, MatchKind, MemoryIndex, PostingCursor, Record, SimpleTokenizer};
//!
//! let tokenizer = SimpleTokenizer::default();
//! let index = MemoryIndex::from_records(
//!     [Record::new(1, ["Tuning MySQL performance"])],
//!     &tokenizer,
//! );
//! let mut cursor = index.open("perf", MatchKind::Prefix).unwrap();
//! assert_eq!(cursor.advance(0).unwrap().map(|p| p.doc), Some(1));
//! ```

#![warn(missing_docs)]

mod corpus;
mod error;
mod index;
mod memory;
mod record;
mod stopwords;
mod tokenizer;

pub use corpus::Corpus;
pub use error::IndexError;
pub use index::{DocId, Index, MatchKind, Posting, PostingCursor};
pub use memory::{MemoryCursor, MemoryIndex};
pub use record::{Record, RecordSource};
pub use stopwords::Stopwords;
pub use tokenizer::{SimpleTokenizer, Tokenizer, Word};
