//! Weight propagation.
//!
//! When a leaf matches a document, its weight climbs toward the root. Each
//! expression on the way collects contributions in its [`Slot`] and only
//! passes something up once it is satisfied:
//!
//! - a required child adds `weight / ythresh` and counts toward `ythresh`; the
//!   child that completes the count fires the expression
//! - an excluded child vetoes the expression for the document
//! - a natural child adds `weight / 3` (or its full weight when the
//!   expression has no required children) and fires an already satisfied
//!   expression, later ones only pass their weight up
//!
//! An expression fires at most once per document.

use ftb_index::DocId;
use ftb_query::{NodeId, Polarity, QueryTree};

use crate::{
    plan::MergePlan,
    state::{Mode, Slot},
};

/// What a child passes to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    /// A required child matched.
    Yes,
    /// An excluded child matched.
    No,
    /// A natural child matched.
    Natural,
    /// Extra weight from an expression that already fired.
    WeakOnly,
}

impl From<Polarity> for Signal {
    fn from(polarity: Polarity) -> Self {
        match polarity {
            Polarity::Required => Self::Yes,
            Polarity::Excluded => Self::No,
            Polarity::Natural => Self::Natural,
        }
    }
}

/// Propagates a match of `leaf` in `doc` up the tree.
///
/// `verify` is asked whether a phrase expression's words are adjacent before
/// it fires.
pub fn climb(
    tree: &QueryTree,
    plan: &MergePlan,
    slots: &mut [Slot],
    leaf: NodeId,
    doc: DocId,
    mode: Mode,
    verify: &mut dyn FnMut(NodeId) -> bool,
) {
    let mut weight = tree.node(leaf).weight;
    let mut signal = Signal::from(tree.node(leaf).polarity);
    let mut child = leaf;

    while let Some(id) = tree.node(child).parent {
        let node = tree.node(id);
        let ythresh = tree.ythresh(id);
        let threshold = match mode {
            Mode::Scan => ythresh,
            Mode::Merge => plan.merge_threshold(tree, id),
        };
        let slot = &mut slots[id];
        slot.reset_for(doc);
        if slot.nos > 0 || slot.phrase_failed {
            break;
        }

        match signal {
            Signal::Yes => {
                weight /= f64::from(ythresh.max(1));
                slot.weight += weight;
                slot.yesses = (slot.yesses + 1).min(ythresh);
                if slot.fired || slot.yesses < threshold {
                    break;
                }
                let has_phrase = tree.expr(id).is_some_and(|e| e.phrase.is_some());
                if has_phrase && !verify(id) {
                    slot.phrase_failed = true;
                    break;
                }
                slot.fired = true;
                weight = slot.weight * node.weight;
                signal = Signal::from(node.polarity);
            }
            Signal::No => {
                slot.nos += 1;
                break;
            }
            Signal::Natural | Signal::WeakOnly => {
                if ythresh > 0 {
                    weight /= 3.0;
                }
                slot.weight += weight;
                if slot.yesses < threshold {
                    break;
                }
                if signal == Signal::Natural && !slot.fired {
                    slot.fired = true;
                    signal = Signal::from(node.polarity);
                } else {
                    signal = Signal::WeakOnly;
                }
                weight *= node.weight;
            }
        }
        child = id;
    }
}

#[cfg(test)]
mod tests {
    use ftb_config::SearchSettings;
    use ftb_index::{SimpleTokenizer, Stopwords};
    use ftb_query::{ROOT, parse};

    use super::*;
    use crate::state::alloc_slots;

    struct Fixture {
        tree: QueryTree,
        plan: MergePlan,
        slots: Vec<Slot>,
    }

    impl Fixture {
        fn new(query: &str) -> Self {
            let tokenizer = SimpleTokenizer::with_stopwords(1, 84, Stopwords::none());
            let tree = parse(query, &tokenizer, &SearchSettings::default()).unwrap();
            let plan = MergePlan::new(&tree);
            let slots = alloc_slots(tree.len()).unwrap();
            Self { tree, plan, slots }
        }

        /// Climbs every leaf named in `words`, in order, for `doc`.
        fn hit(&mut self, doc: DocId, words: &[&str], mode: Mode, phrase_ok: bool) {
            for word in words {
                let leaf = self.tree.leaves_with_text(word)[0];
                climb(
                    &self.tree,
                    &self.plan,
                    &mut self.slots,
                    leaf,
                    doc,
                    mode,
                    &mut |_| phrase_ok,
                );
            }
        }

        fn root(&self) -> Slot {
            self.slots[ROOT]
        }

        fn matches(&self, doc: DocId) -> bool {
            self.root().matches(doc, self.tree.ythresh(ROOT))
        }
    }

    #[test]
    fn all_required_words_needed() {
        let mut f = Fixture::new("+apple +pear");
        f.hit(1, &["apple"], Mode::Scan, true);
        assert!(!f.matches(1));
        f.hit(1, &["pear"], Mode::Scan, true);
        assert!(f.matches(1));
        assert!((f.root().weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn excluded_word_vetoes() {
        let mut f = Fixture::new("+apple -rotten");
        f.hit(1, &["rotten", "apple"], Mode::Scan, true);
        assert_eq!(f.root().nos, 1);
        assert!(!f.matches(1));
    }

    #[test]
    fn new_document_resets_state() {
        let mut f = Fixture::new("+apple -rotten");
        f.hit(1, &["rotten"], Mode::Scan, true);
        f.hit(2, &["apple"], Mode::Scan, true);
        assert!(f.matches(2));
    }

    #[test]
    fn natural_words_add_a_third_under_required() {
        let mut f = Fixture::new("+apple pear");
        f.hit(1, &["apple", "pear"], Mode::Scan, true);
        assert!((f.root().weight - (1.0 + 1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn natural_words_alone_add_full_weight() {
        let mut f = Fixture::new("apple pear");
        f.hit(1, &["apple", "pear"], Mode::Scan, true);
        assert!((f.root().weight - 2.0).abs() < 1e-12);
        assert!(f.matches(1));
    }

    #[test]
    fn nesting_keeps_weight() {
        for query in ["+apple", "+(apple)", "+((apple))"] {
            let mut f = Fixture::new(query);
            f.hit(1, &["apple"], Mode::Scan, true);
            assert!(f.matches(1), "{query}");
            assert!((f.root().weight - 1.0).abs() < 1e-12, "{query}");
        }
    }

    #[test]
    fn weight_markers_scale_score() {
        let mut f = Fixture::new("+>>apple");
        f.hit(1, &["apple"], Mode::Scan, true);
        assert!((f.root().weight - 2.25).abs() < 1e-12);
    }

    #[test]
    fn group_fires_once() {
        // The natural word after the group fired only passes weight up, and
        // is divided again at the root.
        let mut f = Fixture::new("+(+apple pear)");
        f.hit(1, &["apple", "pear"], Mode::Scan, true);
        assert_eq!(f.root().yesses, 1);
        assert!((f.root().weight - (1.0 + 1.0 / 9.0)).abs() < 1e-12);
    }

    #[test]
    fn natural_before_required_is_included_when_firing() {
        let mut f = Fixture::new("+(+apple pear)");
        f.hit(1, &["pear", "apple"], Mode::Scan, true);
        assert!((f.root().weight - (1.0 + 1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn excluded_group_vetoes_when_satisfied() {
        let mut f = Fixture::new("+apple -(+pear +plum)");
        f.hit(1, &["pear", "apple"], Mode::Scan, true);
        assert!(f.matches(1));
        f.hit(2, &["pear", "plum", "apple"], Mode::Scan, true);
        assert!(!f.matches(2));
    }

    #[test]
    fn failed_phrase_blocks_expression() {
        let mut f = Fixture::new("\"fruit salad\"");
        f.hit(1, &["fruit", "salad"], Mode::Scan, false);
        assert!(!f.matches(1));
        let phrase = f.tree.expr(ROOT).unwrap().children[0];
        assert!(f.slots[phrase].phrase_failed);

        f.hit(2, &["fruit", "salad"], Mode::Scan, true);
        assert!(f.matches(2));
    }

    #[test]
    fn merge_mode_counts_phrase_words() {
        let mut f = Fixture::new("\"fruit salad\"");
        f.hit(1, &["fruit"], Mode::Merge, true);
        assert!(!f.matches(1));
        f.hit(1, &["salad"], Mode::Merge, true);
        assert!(f.matches(1));
    }

    #[test]
    fn merge_mode_uses_discounted_threshold() {
        let mut f = Fixture::new("+apple +comp*");
        f.hit(1, &["apple"], Mode::Merge, true);
        let threshold = f.plan.merge_threshold(&f.tree, ROOT);
        assert!(f.root().matches(1, threshold));
        assert!(!f.matches(1));
    }

    #[test]
    fn negated_weight_lowers_score() {
        let mut f = Fixture::new("apple ~pear");
        f.hit(1, &["apple", "pear"], Mode::Scan, true);
        assert!((f.root().weight - 0.5).abs() < 1e-12);
    }
}
