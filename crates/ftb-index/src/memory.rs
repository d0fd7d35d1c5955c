//! In-memory word index and record store.

use std::{
    collections::{BTreeMap, BTreeSet},
    ops::Bound,
};

use log::{debug, trace};

use crate::{
    DocId, Index, IndexError, MatchKind, Posting, PostingCursor, Record, RecordSource, Tokenizer,
};

/// An in-memory index over a set of records.
///
/// Postings are kept per folded word, and records are kept by id so the same
/// value serves as both the [`Index`] and the [`RecordSource`] of a search.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    /// Folded word to the documents containing it.
    postings: BTreeMap<String, BTreeSet<DocId>>,
    /// Stored records by id.
    records: BTreeMap<DocId, Record>,
}

impl MemoryIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from records.
    pub fn from_records<I>(records: I, tokenizer: &dyn Tokenizer) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut index = Self::new();
        for record in records {
            index.insert(record, tokenizer);
        }
        index
    }

    /// Indexes a record and stores it.
    ///
    /// Re-inserting an id replaces the stored record but keeps the postings of
    /// the earlier version.
    pub fn insert(&mut self, record: Record, tokenizer: &dyn Tokenizer) {
        let mut words = 0;
        for field in &record.fields {
            for word in tokenizer.tokenize(field, false) {
                self.postings.entry(word.text).or_default().insert(record.id);
                words += 1;
            }
        }
        trace!("indexed record {} ({words} words)", record.id);
        self.records.insert(record.id, record);
    }

    /// Removes a stored record and leaves its postings in place.
    ///
    /// Searches will still see the document in posting lists but fail to fetch
    /// it, the way a row deleted between index read and fetch behaves.
    pub fn remove_record(&mut self, doc: DocId) -> Option<Record> {
        self.records.remove(&doc)
    }

    /// Returns a stored record.
    pub fn get(&self, doc: DocId) -> Option<&Record> {
        self.records.get(&doc)
    }

    /// Returns the stored records in id order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Returns the number of distinct indexed words.
    pub fn word_count(&self) -> usize {
        self.postings.len()
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Index for MemoryIndex {
    type Cursor = MemoryCursor;

    fn open(&self, term: &str, kind: MatchKind) -> Result<Self::Cursor, IndexError> {
        let mut postings: Vec<Posting> = match kind {
            MatchKind::Exact => self
                .postings
                .get(term)
                .into_iter()
                .flat_map(|docs| {
                    docs.iter().map(|&doc| Posting {
                        doc,
                        word: term.to_string(),
                    })
                })
                .collect(),
            MatchKind::Prefix => self
                .postings
                .range::<str, _>((Bound::Included(term), Bound::Unbounded))
                .take_while(|(word, _)| word.starts_with(term))
                .flat_map(|(word, docs)| {
                    docs.iter().map(move |&doc| Posting {
                        doc,
                        word: word.clone(),
                    })
                })
                .collect(),
        };
        postings.sort_by(|a, b| a.doc.cmp(&b.doc).then_with(|| a.word.cmp(&b.word)));
        debug!("opened {kind:?} cursor for '{term}' ({} postings)", postings.len());
        Ok(MemoryCursor { postings, next: 0 })
    }
}

impl RecordSource for MemoryIndex {
    fn fetch(&self, doc: DocId) -> Result<Option<Record>, IndexError> {
        Ok(self.records.get(&doc).cloned())
    }
}

/// Cursor over a materialized posting list.
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    /// Postings sorted by document, then word.
    postings: Vec<Posting>,
    /// Index of the next posting to consider.
    next: usize,
}

impl PostingCursor for MemoryCursor {
    fn advance(&mut self, min_doc: DocId) -> Result<Option<Posting>, IndexError> {
        let rest = self.postings.get(self.next..).unwrap_or_default();
        self.next += rest.partition_point(|p| p.doc < min_doc);
        let posting = self.postings.get(self.next).cloned();
        if posting.is_some() {
            self.next += 1;
        }
        Ok(posting)
    }
}
