//! Posting-list contracts.
//!
//! The search engine never touches storage directly. It opens a
//! [`PostingCursor`] per query word through the [`Index`] trait and walks it
//! forward with [`PostingCursor::advance`].

use crate::IndexError;

/// Document identifier. Documents are ordered by id.
pub type DocId = u64;

/// How a term is looked up in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Only the exact folded word.
    Exact,
    /// Every indexed word starting with the folded term.
    Prefix,
}

/// One entry of a posting list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// Document containing the word.
    pub doc: DocId,
    /// The indexed word that matched. Differs from the term for prefix lookups.
    pub word: String,
}

/// A forward-only cursor over the postings of one term.
///
/// Postings are produced in non-decreasing document order. A prefix cursor
/// may yield the same document once per matching word.
pub trait PostingCursor {
    /// Moves past the current posting and returns the next one whose document
    /// is at least `min_doc`, or `None` when the list is exhausted.
    fn advance(&mut self, min_doc: DocId) -> Result<Option<Posting>, IndexError>;
}

/// A word index that can open posting cursors.
pub trait Index {
    /// Cursor type returned by [`Index::open`].
    type Cursor: PostingCursor;

    /// Opens a cursor positioned before the first posting of `term`.
    fn open(&self, term: &str, kind: MatchKind) -> Result<Self::Cursor, IndexError>;
}

impl<T: Index + ?Sized> Index for &T {
    type Cursor = T::Cursor;

    fn open(&self, term: &str, kind: MatchKind) -> Result<Self::Cursor, IndexError> {
        (**self).open(term, kind)
    }
}
