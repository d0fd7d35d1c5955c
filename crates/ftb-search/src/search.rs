//! Search entry points.
//!
//! A [`Searcher`] borrows the index, the record store and the tokenizer, and
//! turns query strings into [`BooleanSearch`] handles. Each handle owns its
//! parsed tree and all evaluation state, so several searches can run over the
//! same collaborators at once.

use ftb_config::SearchSettings;
use ftb_index::{DocId, Index, Record, RecordSource, Tokenizer};
use ftb_query::{QueryTree, parse};
use log::{debug, trace};

use crate::{
    SearchError,
    merge::{MergeScheduler, Phase},
    plan::MergePlan,
    scan::Scanner,
};

/// Runs boolean queries over an index and its records.
pub struct Searcher<'a, I, R> {
    /// Posting lists.
    index: &'a I,
    /// Stored records, fetched to confirm and score candidates.
    records: &'a R,
    /// Tokenizer used for the query and for scanned records.
    tokenizer: &'a dyn Tokenizer,
    /// Query language settings.
    settings: SearchSettings,
}

impl<'a, I: Index, R: RecordSource> Searcher<'a, I, R> {
    /// Creates a searcher with default query settings.
    pub fn new(index: &'a I, records: &'a R, tokenizer: &'a dyn Tokenizer) -> Self {
        Self {
            index,
            records,
            tokenizer,
            settings: SearchSettings::default(),
        }
    }

    /// Replaces the query settings.
    #[must_use]
    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the query settings.
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Parses `query` and prepares a search for it.
    ///
    /// No posting list is read until the first [`BooleanSearch::next_match`].
    pub fn search(&self, query: &str) -> Result<BooleanSearch<'a, I, R>, SearchError> {
        let tree = parse(query, self.tokenizer, &self.settings)?;
        BooleanSearch::new(tree, self.index, self.records, self.tokenizer)
    }
}

/// One boolean query in progress.
///
/// Matching documents are produced in increasing id order by
/// [`next_match`](Self::next_match). Any record can be scored against the
/// query with [`relevance_for`](Self::relevance_for) without disturbing the
/// index search.
pub struct BooleanSearch<'a, I: Index, R> {
    /// Parsed query.
    tree: QueryTree,
    /// Merge decisions for the query.
    plan: MergePlan,
    /// Posting lists.
    index: &'a I,
    /// Stored records.
    records: &'a R,
    /// Tokenizer for scanned records.
    tokenizer: &'a dyn Tokenizer,
    /// Index search state; `None` once closed.
    merge: Option<MergeScheduler<I::Cursor>>,
    /// Record scoring state.
    scanner: Scanner,
    /// Score of the last emitted document.
    relevance: f64,
}

impl<'a, I: Index, R: RecordSource> BooleanSearch<'a, I, R> {
    /// Prepares a search for an already parsed query.
    pub fn new(
        tree: QueryTree,
        index: &'a I,
        records: &'a R,
        tokenizer: &'a dyn Tokenizer,
    ) -> Result<Self, SearchError> {
        let plan = MergePlan::new(&tree);
        let merge = MergeScheduler::new(&tree, &plan)?;
        let scanner = Scanner::new(&tree)?;
        debug!("prepared search over {} nodes, {} leaves", tree.len(), tree.leaves().len());
        Ok(Self {
            tree,
            plan,
            index,
            records,
            tokenizer,
            merge: Some(merge),
            scanner,
            relevance: 0.0,
        })
    }

    /// Returns the next matching document, or `None` when there are no more.
    ///
    /// Candidates that need confirmation are fetched and scored; records that
    /// vanished from the store are skipped. After an error the search is over
    /// and later calls return `Ok(None)`.
    pub fn next_match(&mut self) -> Result<Option<DocId>, SearchError> {
        let merge = self.merge.as_mut().ok_or(SearchError::Closed)?;
        loop {
            let Some(doc) = merge.next_candidate(&self.tree, &self.plan, self.index)? else {
                return Ok(None);
            };
            if !self.plan.needs_scan() {
                self.relevance = merge.root_weight();
                trace!("match {doc} ({})", self.relevance);
                return Ok(Some(doc));
            }

            let record = match self.records.fetch(doc) {
                Ok(Some(record)) => record,
                Ok(None) => {
                    debug!("record {doc} vanished, skipping");
                    continue;
                }
                Err(source) => {
                    merge.finish();
                    return Err(SearchError::RecordFetch { doc, source });
                }
            };
            let score = self
                .scanner
                .score(&self.tree, &self.plan, self.tokenizer, &record);
            if score > 0.0 {
                self.relevance = score;
                trace!("match {doc} ({score})");
                return Ok(Some(doc));
            }
            trace!("candidate {doc} rejected by scan");
        }
    }

    /// Scores `record` against the query; 0 when it does not match.
    pub fn relevance_for(&mut self, record: &Record) -> Result<f64, SearchError> {
        if self.merge.is_none() {
            return Err(SearchError::Closed);
        }
        Ok(self
            .scanner
            .score(&self.tree, &self.plan, self.tokenizer, record))
    }

    /// Fetches document `doc` and scores it; 0 when it does not exist.
    pub fn relevance_for_doc(&mut self, doc: DocId) -> Result<f64, SearchError> {
        if self.merge.is_none() {
            return Err(SearchError::Closed);
        }
        match self.records.fetch(doc) {
            Ok(Some(record)) => self.relevance_for(&record),
            Ok(None) => Ok(0.0),
            Err(source) => Err(SearchError::RecordFetch { doc, source }),
        }
    }

    /// Returns the score of the last document [`next_match`](Self::next_match)
    /// produced.
    pub fn current_relevance(&self) -> f64 {
        self.relevance
    }

    /// Restarts the index search from the first document.
    pub fn rewind(&mut self) -> Result<(), SearchError> {
        let merge = self.merge.as_mut().ok_or(SearchError::Closed)?;
        merge.rewind();
        self.relevance = 0.0;
        debug!("search rewound");
        Ok(())
    }

    /// Releases the cursors and all search state. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.merge.take().is_some() {
            debug!("search closed");
        }
    }

    /// Returns true once [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.merge.is_none()
    }

    /// Returns the phase of the index search.
    pub fn phase(&self) -> Phase {
        self.merge.as_ref().map_or(Phase::Done, MergeScheduler::phase)
    }

    /// Returns the parsed query.
    pub fn tree(&self) -> &QueryTree {
        &self.tree
    }

    /// Returns the merge decisions for the query.
    pub fn plan(&self) -> &MergePlan {
        &self.plan
    }
}

impl<I: Index, R: RecordSource> Iterator for BooleanSearch<'_, I, R> {
    type Item = Result<DocId, SearchError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_match() {
            Err(SearchError::Closed) => None,
            other => other.transpose(),
        }
    }
}
