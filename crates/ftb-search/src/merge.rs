//! Posting merge.
//!
//! The scheduler keeps one cursor per merged leaf in a min-queue keyed by the
//! document each cursor is positioned on. A batch takes every cursor sitting
//! on the smallest document, propagates their leaves, moves them forward and
//! then checks whether the root matched.
//!
//! Leaves of one high-water-mark chain skip ahead together. Once a required
//! leaf has moved to document `d`, nothing below `d` can satisfy the chain,
//! so the other leaves of the chain seek straight to `d`.

use std::{cmp::Reverse, collections::BinaryHeap};

use ftb_index::{DocId, Index, MatchKind, PostingCursor};
use ftb_query::{NodeId, Polarity, QueryTree, ROOT, ROOT_CHAIN};
use log::{debug, trace};

use crate::{
    SearchError,
    climb::climb,
    dedupe::DuplicateFilter,
    plan::MergePlan,
    state::{Mode, Slot, alloc_slots},
};

/// Lifecycle of an index search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Cursors are not open yet.
    Uninitialized,
    /// Cursors are open and positioned on their first postings.
    Ready,
    /// Candidates are being produced.
    MergeSearch,
    /// No more candidates.
    Done,
}

/// Queue position of a cursor.
///
/// Ordered by document, then veto level and depth descending, so exclusions
/// and deep leaves of one document are propagated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueKey {
    /// Document the cursor is positioned on.
    doc: DocId,
    /// Veto level of the leaf, reversed.
    veto: Reverse<u32>,
    /// Depth of the leaf, reversed.
    depth: Reverse<u32>,
    /// The leaf.
    leaf: NodeId,
}

impl QueueKey {
    /// Creates the key of `leaf` positioned on `doc`.
    fn new(tree: &QueryTree, leaf: NodeId, doc: DocId) -> Self {
        Self {
            doc,
            veto: Reverse(tree.term(leaf).map_or(0, |t| t.veto_level)),
            depth: Reverse(tree.node(leaf).depth),
            leaf,
        }
    }
}

/// Merges the posting lists of a query into candidate documents.
#[derive(Debug)]
pub struct MergeScheduler<C> {
    /// Current phase.
    phase: Phase,
    /// Open cursor per node id; `None` for expressions, scan-only leaves and
    /// exhausted cursors.
    cursors: Vec<Option<C>>,
    /// Positioned cursors.
    queue: BinaryHeap<Reverse<QueueKey>>,
    /// High-water mark per chain.
    marks: Vec<DocId>,
    /// Merge slots per node.
    slots: Vec<Slot>,
    /// Emitted documents, when prefix leaves are merged.
    dedupe: Option<DuplicateFilter>,
    /// Set when a root-chain requirement ran out; the search ends after the
    /// current batch.
    stop_after_batch: bool,
}

impl<C: PostingCursor> MergeScheduler<C> {
    /// Creates an unstarted scheduler for `tree`.
    pub fn new(tree: &QueryTree, plan: &MergePlan) -> Result<Self, SearchError> {
        let mut cursors = Vec::new();
        cursors
            .try_reserve_exact(tree.len())
            .map_err(|_| SearchError::Allocation)?;
        cursors.resize_with(tree.len(), || None);
        Ok(Self {
            phase: Phase::Uninitialized,
            cursors,
            queue: BinaryHeap::new(),
            marks: vec![0; tree.chain_count()],
            slots: alloc_slots(tree.len())?,
            dedupe: plan.dedupe().then(DuplicateFilter::new),
            stop_after_batch: false,
        })
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the root weight of the last merged document.
    pub fn root_weight(&self) -> f64 {
        self.slots[ROOT].weight
    }

    /// Returns the number of cursors that are not exhausted.
    pub fn open_cursors(&self) -> usize {
        self.cursors.iter().filter(|c| c.is_some()).count()
    }

    /// Opens a cursor per merged leaf and positions it on its first posting.
    fn start<I>(&mut self, tree: &QueryTree, plan: &MergePlan, index: &I) -> Result<(), SearchError>
    where
        I: Index<Cursor = C>,
    {
        for leaf in plan.merged_leaves(tree) {
            let Some(term) = tree.term(leaf) else {
                continue;
            };
            let kind = if term.truncated {
                MatchKind::Prefix
            } else {
                MatchKind::Exact
            };
            let cursor = index
                .open(&term.text, kind)
                .map_err(|source| SearchError::IndexRead {
                    term: term.text.clone(),
                    source,
                })?;
            self.cursors[leaf] = Some(cursor);
            self.advance(tree, leaf, 0)?;
        }
        self.phase = Phase::Ready;
        debug!(
            "merge ready: {} cursors open, {} chains",
            self.open_cursors(),
            self.marks.len()
        );
        Ok(())
    }

    /// Moves the cursor of `leaf` past `current`, skipping to its chain mark,
    /// and queues it again unless it is exhausted.
    fn advance(&mut self, tree: &QueryTree, leaf: NodeId, current: DocId) -> Result<(), SearchError> {
        let Some(term) = tree.term(leaf) else {
            return Ok(());
        };
        let Some(cursor) = self.cursors[leaf].as_mut() else {
            return Ok(());
        };
        let chain = term.chain.0;
        let next = cursor
            .advance(self.marks[chain].max(current))
            .map_err(|source| SearchError::IndexRead {
                term: term.text.clone(),
                source,
            })?;
        let required = tree.node(leaf).polarity == Polarity::Required;

        match next {
            Some(posting) => {
                if required {
                    self.marks[chain] = self.marks[chain].max(posting.doc);
                }
                self.queue.push(Reverse(QueueKey::new(tree, leaf, posting.doc)));
            }
            None => {
                self.cursors[leaf] = None;
                if required && term.chain == ROOT_CHAIN {
                    debug!("required word '{}' exhausted, stopping after this batch", term.text);
                    self.stop_after_batch = true;
                } else if required {
                    // The chain can never be satisfied again.
                    self.marks[chain] = DocId::MAX;
                }
            }
        }
        Ok(())
    }

    /// Returns the next document whose merge state satisfies the root, or
    /// `None` when the search is over.
    ///
    /// The first call opens the cursors. After an error the scheduler is
    /// [`Phase::Done`].
    pub fn next_candidate<I>(
        &mut self,
        tree: &QueryTree,
        plan: &MergePlan,
        index: &I,
    ) -> Result<Option<DocId>, SearchError>
    where
        I: Index<Cursor = C>,
    {
        match self.phase {
            Phase::Done => return Ok(None),
            Phase::Uninitialized => {
                if let Err(err) = self.start(tree, plan, index) {
                    self.finish();
                    return Err(err);
                }
            }
            Phase::Ready | Phase::MergeSearch => {}
        }
        self.phase = Phase::MergeSearch;

        let threshold = plan.merge_threshold(tree, ROOT);
        loop {
            if self.stop_after_batch {
                self.finish();
                return Ok(None);
            }
            let Some(&Reverse(first)) = self.queue.peek() else {
                debug!("all posting lists exhausted");
                self.finish();
                return Ok(None);
            };
            let doc = first.doc;
            if let Err(err) = self.run_batch(tree, plan, doc) {
                self.finish();
                return Err(err);
            }

            if !self.slots[ROOT].matches(doc, threshold) {
                continue;
            }
            if let Some(filter) = &mut self.dedupe
                && !filter.should_emit(doc)
            {
                trace!("document {doc} already emitted");
                continue;
            }
            return Ok(Some(doc));
        }
    }

    /// Propagates and advances every cursor positioned on `doc`.
    fn run_batch(&mut self, tree: &QueryTree, plan: &MergePlan, doc: DocId) -> Result<(), SearchError> {
        while self.queue.peek().is_some_and(|Reverse(key)| key.doc == doc) {
            let Some(Reverse(key)) = self.queue.pop() else {
                break;
            };
            let leaf = key.leaf;
            // A prefix cursor can land on one document once per word.
            if self.slots[leaf].doc != Some(doc) {
                self.slots[leaf].doc = Some(doc);
                let mut assume = |id| plan.assume_phrase(id);
                climb(tree, plan, &mut self.slots, leaf, doc, Mode::Merge, &mut assume);
            }
            self.advance(tree, leaf, doc)?;
        }
        Ok(())
    }

    /// Ends the search and releases the cursors.
    pub fn finish(&mut self) {
        if self.phase != Phase::Done {
            debug!("merge done");
        }
        self.phase = Phase::Done;
        self.queue.clear();
        self.cursors.iter_mut().for_each(|c| *c = None);
    }

    /// Returns the scheduler to its unstarted state.
    pub fn rewind(&mut self) {
        self.finish();
        self.phase = Phase::Uninitialized;
        self.marks.fill(0);
        self.slots.fill(Slot::default());
        if let Some(filter) = &mut self.dedupe {
            filter.clear();
        }
        self.stop_after_batch = false;
    }
}

#[cfg(test)]
mod tests {
    use ftb_config::SearchSettings;
    use ftb_index::{MemoryIndex, Record, SimpleTokenizer, Stopwords};
    use ftb_query::parse;

    use super::*;

    fn tokenizer() -> SimpleTokenizer {
        SimpleTokenizer::with_stopwords(1, 84, Stopwords::none())
    }

    fn index(docs: &[(DocId, &str)]) -> MemoryIndex {
        MemoryIndex::from_records(
            docs.iter().map(|&(id, text)| Record::new(id, [text])),
            &tokenizer(),
        )
    }

    fn candidates(query: &str, index: &MemoryIndex) -> Vec<DocId> {
        let tree = parse(query, &tokenizer(), &SearchSettings::default()).unwrap();
        let plan = MergePlan::new(&tree);
        let mut merge = MergeScheduler::new(&tree, &plan).unwrap();
        let mut out = Vec::new();
        while let Some(doc) = merge.next_candidate(&tree, &plan, index).unwrap() {
            out.push(doc);
        }
        assert_eq!(merge.phase(), Phase::Done);
        out
    }

    #[test]
    fn queue_key_orders_vetoes_first() {
        let a = QueueKey {
            doc: 1,
            veto: Reverse(0),
            depth: Reverse(1),
            leaf: 1,
        };
        let b = QueueKey {
            veto: Reverse(2),
            leaf: 2,
            ..a
        };
        let c = QueueKey { doc: 0, ..a };
        let mut heap = BinaryHeap::from([Reverse(a), Reverse(b), Reverse(c)]);
        assert_eq!(heap.pop().map(|r| r.0), Some(c));
        assert_eq!(heap.pop().map(|r| r.0), Some(b));
        assert_eq!(heap.pop().map(|r| r.0), Some(a));
    }

    #[test]
    fn conjunction() {
        let index = index(&[(1, "apple pear"), (2, "apple"), (3, "pear"), (4, "pear apple")]);
        assert_eq!(candidates("+apple +pear", &index), vec![1, 4]);
    }

    #[test]
    fn disjunction() {
        let index = index(&[(1, "apple"), (2, "plum"), (3, "pear")]);
        assert_eq!(candidates("apple pear", &index), vec![1, 3]);
    }

    #[test]
    fn exclusion() {
        let index = index(&[(1, "apple"), (2, "apple rotten"), (3, "rotten")]);
        assert_eq!(candidates("+apple -rotten", &index), vec![1]);
        assert_eq!(candidates("apple -rotten", &index), vec![1]);
    }

    #[test]
    fn exclusion_only_matches_nothing() {
        let index = index(&[(1, "apple"), (2, "rotten")]);
        assert!(candidates("-rotten", &index).is_empty());
    }

    #[test]
    fn prefix_emits_each_document_once() {
        let index = index(&[(1, "computer company"), (2, "banana"), (3, "compete complex compete")]);
        assert_eq!(candidates("comp*", &index), vec![1, 3]);
    }

    #[test]
    fn missing_required_word_ends_search() {
        let index = index(&[(1, "apple"), (2, "apple")]);
        assert!(candidates("+apple +kiwi", &index).is_empty());
    }

    #[test]
    fn nested_groups() {
        let index = index(&[(1, "apple pear"), (2, "apple plum"), (3, "apple"), (4, "pear plum")]);
        assert_eq!(candidates("+apple +(pear plum)", &index), vec![1, 2]);
        assert_eq!(candidates("+apple -(+pear +plum)", &index), vec![1, 2, 3]);
    }

    #[test]
    fn rewind_restarts() {
        let index = index(&[(1, "comp"), (2, "computer")]);
        let tree = parse("comp*", &tokenizer(), &SearchSettings::default()).unwrap();
        let plan = MergePlan::new(&tree);
        let mut merge = MergeScheduler::new(&tree, &plan).unwrap();
        assert_eq!(merge.next_candidate(&tree, &plan, &index).unwrap(), Some(1));
        assert_eq!(merge.phase(), Phase::MergeSearch);
        merge.rewind();
        assert_eq!(merge.phase(), Phase::Uninitialized);
        assert_eq!(merge.next_candidate(&tree, &plan, &index).unwrap(), Some(1));
        assert_eq!(merge.next_candidate(&tree, &plan, &index).unwrap(), Some(2));
        assert_eq!(merge.next_candidate(&tree, &plan, &index).unwrap(), None);
        assert_eq!(merge.open_cursors(), 0);
    }

    #[test]
    fn weight_of_last_candidate() {
        let index = index(&[(1, "apple pear")]);
        let tree = parse("+apple pear", &tokenizer(), &SearchSettings::default()).unwrap();
        let plan = MergePlan::new(&tree);
        let mut merge = MergeScheduler::new(&tree, &plan).unwrap();
        assert_eq!(merge.next_candidate(&tree, &plan, &index).unwrap(), Some(1));
        assert!((merge.root_weight() - (1.0 + 1.0 / 3.0)).abs() < 1e-12);
    }
}
