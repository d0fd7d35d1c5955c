//! Duplicate suppression for prefix queries.

use std::collections::BTreeSet;

use ftb_index::DocId;

/// Remembers emitted documents so a prefix matching several words of one
/// document emits it once.
#[derive(Debug, Clone, Default)]
pub struct DuplicateFilter {
    /// Documents emitted so far.
    seen: BTreeSet<DocId>,
}

impl DuplicateFilter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time `doc` is offered.
    pub fn should_emit(&mut self, doc: DocId) -> bool {
        self.seen.insert(doc)
    }

    /// Forgets all emitted documents.
    pub fn clear(&mut self) {
        self.seen.clear();
    }

    /// Returns the number of emitted documents.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
