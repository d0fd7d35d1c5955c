//! Per-document working state.
//!
//! Merge and scan evaluation each keep one [`Slot`] per tree node, indexed by
//! node id, so scoring a record never disturbs an index search in progress.

use ftb_index::DocId;

use crate::SearchError;

/// Which slot set an evaluation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Posting merge over the index.
    Merge,
    /// Scoring one fetched record.
    Scan,
}

/// Working state of one node for its current candidate document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Slot {
    /// Candidate document the state belongs to.
    pub doc: Option<DocId>,
    /// Accumulated weight.
    pub weight: f64,
    /// Satisfied required children.
    pub yesses: u32,
    /// Excluded children that matched.
    pub nos: u32,
    /// Whether the node already propagated for this document.
    pub fired: bool,
    /// Whether the phrase check failed for this document.
    pub phrase_failed: bool,
}

impl Slot {
    /// Moves the slot to `doc`, clearing it if it held another document.
    pub fn reset_for(&mut self, doc: DocId) {
        if self.doc != Some(doc) {
            *self = Self {
                doc: Some(doc),
                ..Self::default()
            };
        }
    }

    /// Returns true if the slot holds a positive, unvetoed match for `doc`
    /// with at least `threshold` required children.
    pub fn matches(&self, doc: DocId, threshold: u32) -> bool {
        self.doc == Some(doc) && self.weight > 0.0 && self.yesses >= threshold && self.nos == 0
    }
}

/// Allocates `len` cleared slots.
pub fn alloc_slots(len: usize) -> Result<Vec<Slot>, SearchError> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(len)
        .map_err(|_| SearchError::Allocation)?;
    slots.resize(len, Slot::default());
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_only_on_new_document() {
        let mut slot = Slot::default();
        slot.reset_for(3);
        slot.weight = 2.0;
        slot.yesses = 1;
        slot.reset_for(3);
        assert_eq!(slot.weight, 2.0);
        slot.reset_for(4);
        assert_eq!(slot, Slot { doc: Some(4), ..Slot::default() });
    }

    #[test]
    fn match_requires_weight_threshold_and_no_veto() {
        let slot = Slot {
            doc: Some(1),
            weight: 1.0,
            yesses: 2,
            ..Slot::default()
        };
        assert!(slot.matches(1, 2));
        assert!(!slot.matches(1, 3));
        assert!(!slot.matches(2, 0));
        assert!(!Slot { nos: 1, ..slot }.matches(1, 2));
        assert!(!Slot { weight: 0.0, ..slot }.matches(1, 2));
    }

    #[test]
    fn alloc_slots_are_cleared() {
        let slots = alloc_slots(4).unwrap();
        assert_eq!(slots.len(), 4);
        assert!(slots.iter().all(|s| s.doc.is_none()));
    }
}
