//! Record scanning and relevance.
//!
//! Scoring a record tokenizes each field, looks every word up among the query
//! leaves and propagates the matched leaves in scan mode. Truncated leaves
//! match any word they are a prefix of, other leaves only an equal word.

use std::{cmp::Reverse, iter};

use ftb_index::{DocId, Record, Tokenizer, Word};
use ftb_query::{NodeId, QueryTree, ROOT};
use log::trace;

use crate::{
    SearchError,
    climb::climb,
    phrase::PhraseVerifier,
    plan::MergePlan,
    state::{Mode, Slot, alloc_slots},
};

/// Scan-mode evaluation state.
#[derive(Debug, Clone)]
pub struct Scanner {
    /// Scan slots per node.
    slots: Vec<Slot>,
    /// Last scored document.
    last: Option<DocId>,
    /// Leaves matched in the record being scored.
    hits: Vec<NodeId>,
    /// Phrase windows.
    phrases: PhraseVerifier,
}

impl Scanner {
    /// Creates a scanner for `tree`.
    pub fn new(tree: &QueryTree) -> Result<Self, SearchError> {
        Ok(Self {
            slots: alloc_slots(tree.len())?,
            last: None,
            hits: Vec::new(),
            phrases: PhraseVerifier::new(tree.len()),
        })
    }

    /// Scores `record` against the query; 0 when it does not match.
    ///
    /// Scoring the same or an earlier document again starts from clean
    /// state, so repeated calls return the same score.
    pub fn score(
        &mut self,
        tree: &QueryTree,
        plan: &MergePlan,
        tokenizer: &dyn Tokenizer,
        record: &Record,
    ) -> f64 {
        let doc = record.id;
        if self.last.is_some_and(|last| doc <= last) {
            self.slots.fill(Slot::default());
        }
        self.last = Some(doc);

        self.hits.clear();
        for field in &record.fields {
            for word in tokenizer.tokenize(field, false) {
                self.collect_hits(tree, doc, &word.text);
            }
        }
        self.hits.sort_by_key(|&leaf| {
            let veto = tree.term(leaf).map_or(0, |t| t.veto_level);
            (Reverse(veto), Reverse(tree.node(leaf).depth))
        });

        let segments: Vec<Vec<Word>> = if tree.has_phrase() {
            record
                .fields
                .iter()
                .map(|field| tokenizer.tokenize(field, true))
                .collect()
        } else {
            Vec::new()
        };
        let phrases = &mut self.phrases;
        let mut verify = |id: NodeId| {
            let phrase = tree.expr(id).and_then(|e| e.phrase.as_deref()).unwrap_or_default();
            phrases.verify(id, phrase, &segments)
        };
        for &leaf in &self.hits {
            climb(tree, plan, &mut self.slots, leaf, doc, Mode::Scan, &mut verify);
        }

        let root = &self.slots[ROOT];
        let score = if root.matches(doc, tree.ythresh(ROOT)) {
            root.weight
        } else {
            0.0
        };
        trace!("scored record {doc}: {score} ({} leaf hits)", self.hits.len());
        score
    }

    /// Records the leaves matching `word` that are not yet seen for `doc`.
    fn collect_hits(&mut self, tree: &QueryTree, doc: DocId, word: &str) {
        let ends = word
            .char_indices()
            .skip(1)
            .map(|(i, _)| i)
            .chain(iter::once(word.len()));
        for end in ends {
            let whole = end == word.len();
            for &leaf in tree.leaves_with_text(&word[..end]) {
                let truncated = tree.term(leaf).is_some_and(|t| t.truncated);
                if !whole && !truncated {
                    continue;
                }
                let slot = &mut self.slots[leaf];
                if slot.doc == Some(doc) {
                    continue;
                }
                slot.doc = Some(doc);
                self.hits.push(leaf);
            }
        }
    }
}
