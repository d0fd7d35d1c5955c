//! Merge plan for truncated words.
//!
//! A prefix cursor can surface one document several times and can be very
//! long, so truncated leaves are only merged from the index when nothing else
//! can narrow the search. The rules, applied per truncated leaf in query
//! order:
//!
//! | leaf position                                   | decision             |
//! |-------------------------------------------------|----------------------|
//! | under an excluded node                          | scan only            |
//! | some ancestor `P` has another counted required child | scan only, chain marked weak |
//! | otherwise                                       | merged, dedupe on    |
//!
//! "Counted" required children of `P` are those not already marked weak. When
//! a leaf goes scan only, every required node between the leaf and `P` is
//! marked weak and discounted from its parent's merge threshold, since it can
//! no longer be seen complete during the merge. Records found by the merge are
//! then confirmed by scanning them.
//!
//! Phrases are not verified during the merge either. A phrase is assumed to
//! match when that can only add candidates, which is when an even number of
//! exclusions lies on its path to the root, and assumed not to match
//! otherwise.

use std::iter;

use ftb_query::{NodeId, NodeKind, Polarity, QueryTree};
use log::debug;

/// Decisions the merge scheduler and the scan path share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Nodes discounted from their parent's merge threshold.
    weak: Vec<bool>,
    /// Weak required children per expression.
    yweaks: Vec<u32>,
    /// Leaves matched only by scanning records.
    scan_only: Vec<bool>,
    /// Assumed merge-time outcome per phrase node.
    phrase_assumed: Vec<bool>,
    /// Whether a truncated leaf is merged from the index.
    dedupe: bool,
    /// Whether merge matches must be confirmed by scanning the record.
    needs_scan: bool,
}

impl MergePlan {
    /// Plans the search for `tree`.
    pub fn new(tree: &QueryTree) -> Self {
        let len = tree.len();
        let mut plan = Self {
            weak: vec![false; len],
            yweaks: vec![0; len],
            scan_only: vec![false; len],
            phrase_assumed: vec![true; len],
            dedupe: false,
            needs_scan: false,
        };

        for (id, node) in tree.nodes().iter().enumerate() {
            match &node.kind {
                NodeKind::Term(term) if term.truncated => plan.place_truncated(tree, id),
                NodeKind::Expr(expr) if expr.phrase.is_some() => {
                    let exclusions = iter::once(id)
                        .chain(tree.ancestors(id))
                        .filter(|&n| {
                            tree.node(n).parent.is_some()
                                && tree.node(n).polarity == Polarity::Excluded
                        })
                        .count();
                    plan.phrase_assumed[id] = exclusions % 2 == 0;
                }
                _ => {}
            }
        }

        plan.needs_scan = plan.scan_only.iter().any(|&s| s) || tree.has_phrase();
        debug!(
            "merge plan: {} merged leaves, dedupe {}, scan confirmation {}",
            plan.merged_leaves(tree).count(),
            plan.dedupe,
            plan.needs_scan
        );
        plan
    }

    /// Decides whether a truncated leaf is merged or scan only.
    fn place_truncated(&mut self, tree: &QueryTree, leaf: NodeId) {
        let excluded = tree.node(leaf).polarity == Polarity::Excluded
            || tree
                .ancestors(leaf)
                .any(|a| tree.node(a).parent.is_some() && tree.node(a).polarity == Polarity::Excluded);
        if excluded {
            debug!("prefix leaf {leaf} is under an exclusion, scan only");
            self.scan_only[leaf] = true;
            return;
        }

        let mut node = leaf;
        while let Some(parent) = tree.node(node).parent {
            let counted = u32::from(self.is_counted(tree, node));
            let others = tree
                .ythresh(parent)
                .saturating_sub(self.yweaks[parent])
                .saturating_sub(counted);
            if others >= 1 {
                debug!("prefix leaf {leaf} has required siblings under node {parent}, scan only");
                self.scan_only[leaf] = true;
                self.mark_weak(tree, leaf, parent);
                return;
            }
            node = parent;
        }

        debug!("prefix leaf {leaf} is merged from the index");
        self.dedupe = true;
    }

    /// Returns true if `node` counts toward its parent's merge threshold.
    fn is_counted(&self, tree: &QueryTree, node: NodeId) -> bool {
        tree.node(node).polarity == Polarity::Required && !self.weak[node]
    }

    /// Marks counted nodes from `leaf` up to, not including, `top` as weak.
    fn mark_weak(&mut self, tree: &QueryTree, leaf: NodeId, top: NodeId) {
        let mut node = leaf;
        while node != top {
            let Some(parent) = tree.node(node).parent else {
                break;
            };
            if self.is_counted(tree, node) {
                self.weak[node] = true;
                self.yweaks[parent] += 1;
            }
            node = parent;
        }
    }

    /// Returns the weak required child count of an expression.
    pub fn yweaks(&self, id: NodeId) -> u32 {
        self.yweaks.get(id).copied().unwrap_or(0)
    }

    /// Returns the number of required children an expression needs during
    /// the merge.
    pub fn merge_threshold(&self, tree: &QueryTree, id: NodeId) -> u32 {
        tree.ythresh(id).saturating_sub(self.yweaks(id))
    }

    /// Returns true if a node is discounted from its parent's merge threshold.
    pub fn is_weak(&self, id: NodeId) -> bool {
        self.weak.get(id).copied().unwrap_or(false)
    }

    /// Returns true if a leaf is only matched by scanning.
    pub fn is_scan_only(&self, leaf: NodeId) -> bool {
        self.scan_only.get(leaf).copied().unwrap_or(false)
    }

    /// Returns the outcome the merge assumes for a phrase node.
    pub fn assume_phrase(&self, id: NodeId) -> bool {
        self.phrase_assumed.get(id).copied().unwrap_or(true)
    }

    /// Returns the leaves read from the index, in node order.
    pub fn merged_leaves<'t>(&'t self, tree: &'t QueryTree) -> impl Iterator<Item = NodeId> + 't {
        (0..tree.len()).filter(move |&id| tree.term(id).is_some() && !self.is_scan_only(id))
    }

    /// Returns true if emitted documents must be deduplicated.
    pub fn dedupe(&self) -> bool {
        self.dedupe
    }

    /// Returns true if merge matches must be confirmed by scoring the record.
    pub fn needs_scan(&self) -> bool {
        self.needs_scan
    }
}
