//! Boolean full-text search for the ftb engine.
//!
//! A [`Searcher`] parses a query into a tree and walks the posting lists of
//! its words in document order. Every time the words present in a document
//! satisfy the query, the document is emitted with a relevance score:
//!
//! - the merge reads one cursor per word and propagates matches up the tree
//!   ([`MergePlan`] decides which words are read from the index)
//! - prefix words and phrases are confirmed by fetching and scanning the
//!   record ([`PhraseVerifier`], [`DuplicateFilter`])
//! - [`BooleanSearch::relevance_for`] scores any record directly
//!
//! # Example
//!
//! ```
//! use ftb_index::{MemoryIndex, Record, SimpleTokenizer, Stopwords};
//! use ftb_search::Searcher;
//!
//! let tokenizer = SimpleTokenizer::with_stopwords(3, 84, Stopwords::none());
//! let index = MemoryIndex::from_records(
//!     [
//!         Record::new(1, ["I ate an apple with a fruit salad"]),
//!         Record::new(2, ["I ate a rotten apple"]),
//!     ],
//!     &tokenizer,
//! );
//! let searcher = Searcher::new(&index, &index, &tokenizer);
//! let mut search = searcher.search("+apple -rotten \"fruit salad\"").unwrap();
//! assert_eq!(search.next_match().unwrap(), Some(1));
//! assert!(search.current_relevance() > 0.0);
//! assert_eq!(search.next_match().unwrap(), None);
//! ```

#![warn(missing_docs)]

mod climb;
mod dedupe;
mod error;
mod merge;
mod phrase;
mod plan;
mod scan;
mod search;
mod state;

pub use climb::climb;
pub use dedupe::DuplicateFilter;
pub use error::SearchError;
pub use merge::{MergeScheduler, Phase};
pub use phrase::{PhraseVerifier, phrase_matches};
pub use plan::MergePlan;
pub use scan::Scanner;
pub use search::{BooleanSearch, Searcher};
pub use state::{Mode, Slot, alloc_slots};
