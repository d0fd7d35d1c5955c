//! Property tests for the boolean search engine.
//!
//! Random documents over a small vocabulary are searched with a fixed set of
//! query shapes, and the merge results are checked against the words each
//! document actually contains.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::collections::BTreeMap;

use ftb_index::{DocId, MemoryIndex, Record, SimpleTokenizer, Stopwords};
use ftb_search::{Searcher, phrase_matches};
use proptest::prelude::*;

/// Words documents are built from.
const VOCABULARY: [&str; 6] = ["apple", "applesauce", "pear", "plum", "fruit", "salad"];

/// Query shapes exercised by the properties.
const QUERIES: [&str; 10] = [
    "+apple +pear",
    "+apple -pear",
    "apple pear",
    "+apple plu*",
    "+appl* +plum",
    "appl*",
    "+pear -(+plum +salad)",
    "+\"fruit salad\" -plum",
    "+pear -\"fruit salad\"",
    "+(apple plum) -(pear*)",
];

fn tokenizer() -> SimpleTokenizer {
    SimpleTokenizer::with_stopwords(1, 84, Stopwords::none())
}

/// Strategy for a corpus: up to 30 documents with increasing ids.
fn corpus_strategy() -> impl Strategy<Value = BTreeMap<DocId, String>> {
    let text = prop::collection::vec(prop::sample::select(VOCABULARY.to_vec()), 0..8)
        .prop_map(|words| words.join(" "));
    prop::collection::btree_map(1u64..500, text, 0..30)
}

fn build(corpus: &BTreeMap<DocId, String>, tokenizer: &SimpleTokenizer) -> MemoryIndex {
    MemoryIndex::from_records(
        corpus.iter().map(|(&id, text)| Record::new(id, [text.as_str()])),
        tokenizer,
    )
}

fn search(index: &MemoryIndex, tokenizer: &SimpleTokenizer, query: &str) -> Vec<DocId> {
    let searcher = Searcher::new(index, index, tokenizer);
    searcher
        .search(query)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

fn has_word(text: &str, word: &str) -> bool {
    text.split(' ').any(|w| w == word)
}

proptest! {
    /// Property: every document emitted for `+a +b` contains both words.
    #[test]
    fn prop_conjunction_contains_all(corpus in corpus_strategy()) {
        let t = tokenizer();
        let index = build(&corpus, &t);
        let found = search(&index, &t, "+apple +pear");
        for doc in &found {
            prop_assert!(has_word(&corpus[doc], "apple") && has_word(&corpus[doc], "pear"));
        }
        let expected = corpus
            .iter()
            .filter(|(_, text)| has_word(text, "apple") && has_word(text, "pear"))
            .count();
        prop_assert_eq!(found.len(), expected);
    }

    /// Property: no document emitted for `+a -b` contains `b`.
    #[test]
    fn prop_exclusion_never_emits_excluded(corpus in corpus_strategy()) {
        let t = tokenizer();
        let index = build(&corpus, &t);
        for doc in search(&index, &t, "+apple -pear") {
            prop_assert!(has_word(&corpus[&doc], "apple"));
            prop_assert!(!has_word(&corpus[&doc], "pear"));
        }
    }

    /// Property: ids are strictly increasing, so never duplicated.
    #[test]
    fn prop_ids_strictly_increase(corpus in corpus_strategy(), query in prop::sample::select(QUERIES.to_vec())) {
        let t = tokenizer();
        let index = build(&corpus, &t);
        let found = search(&index, &t, query);
        prop_assert!(found.windows(2).all(|w| w[0] < w[1]), "{:?}", found);
    }

    /// Property: the merge emits exactly the documents that score above zero.
    #[test]
    fn prop_merge_agrees_with_scoring(corpus in corpus_strategy(), query in prop::sample::select(QUERIES.to_vec())) {
        let t = tokenizer();
        let index = build(&corpus, &t);
        let found = search(&index, &t, query);

        let searcher = Searcher::new(&index, &index, &t);
        let mut scorer = searcher.search(query).unwrap();
        let mut scored = Vec::new();
        for &doc in corpus.keys() {
            if scorer.relevance_for_doc(doc).unwrap() > 0.0 {
                scored.push(doc);
            }
        }
        prop_assert_eq!(found, scored);
    }

    /// Property: scoring a record again gives the same relevance.
    #[test]
    fn prop_relevance_is_idempotent(corpus in corpus_strategy(), query in prop::sample::select(QUERIES.to_vec())) {
        let t = tokenizer();
        let index = build(&corpus, &t);
        let searcher = Searcher::new(&index, &index, &t);
        let mut search = searcher.search(query).unwrap();
        for &doc in corpus.keys().rev() {
            let first = search.relevance_for_doc(doc).unwrap();
            let second = search.relevance_for_doc(doc).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    /// Property: phrase matches agree with a plain substring check when words
    /// are separated by single spaces.
    #[test]
    fn prop_phrase_is_adjacent_words(corpus in corpus_strategy()) {
        let t = tokenizer();
        let index = build(&corpus, &t);
        let found = search(&index, &t, "\"fruit salad\"");
        let phrase = ["fruit".to_string(), "salad".to_string()];
        let expected: Vec<DocId> = corpus
            .iter()
            .filter(|(_, text)| {
                let words: Vec<&str> = text.split(' ').collect();
                words.windows(2).any(|w| w == ["fruit", "salad"])
            })
            .map(|(&id, _)| id)
            .collect();
        for (id, text) in &corpus {
            prop_assert_eq!(phrase_matches(&phrase, text, &t), expected.contains(id));
        }
        prop_assert_eq!(found, expected);
    }
}
