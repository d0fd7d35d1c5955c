//! Phrase verification.
//!
//! A phrase matches when its words appear next to each other, in order, in a
//! single field of the record. Fields are tokenized with stopwords kept, since
//! phrase lists keep them too. A sliding window holds the positions of the
//! last N words of the field and is compared against the phrase after every
//! word.

use std::collections::VecDeque;

use ftb_index::{Tokenizer, Word};
use ftb_query::NodeId;

/// Sliding windows for the phrase expressions of one query.
#[derive(Debug, Clone, Default)]
pub struct PhraseVerifier {
    /// Window per node id; only phrase nodes ever get capacity.
    windows: Vec<VecDeque<usize>>,
}

impl PhraseVerifier {
    /// Creates a verifier with room for `nodes` expressions.
    pub fn new(nodes: usize) -> Self {
        Self {
            windows: vec![VecDeque::new(); nodes],
        }
    }

    /// Returns true if `phrase` occurs in any of `fields`.
    ///
    /// `node` selects the window, which is reused across calls.
    pub fn verify(&mut self, node: NodeId, phrase: &[String], fields: &[Vec<Word>]) -> bool {
        if node >= self.windows.len() {
            self.windows.resize_with(node + 1, VecDeque::new);
        }
        let window = &mut self.windows[node];
        fields
            .iter()
            .any(|words| window_matches(window, phrase, words))
    }
}

/// Slides `window` over `words` looking for `phrase`.
fn window_matches(window: &mut VecDeque<usize>, phrase: &[String], words: &[Word]) -> bool {
    let len = phrase.len();
    if len == 0 {
        return false;
    }
    window.clear();
    window.reserve(len);
    for i in 0..words.len() {
        if window.len() == len {
            window.pop_front();
        }
        window.push_back(i);
        if window.len() == len
            && window
                .iter()
                .map(|&w| words[w].text.as_str())
                .eq(phrase.iter().map(String::as_str))
        {
            return true;
        }
    }
    false
}

/// Returns true if the folded `phrase` occurs in `text`.
pub fn phrase_matches(phrase: &[String], text: &str, tokenizer: &dyn Tokenizer) -> bool {
    let words = tokenizer.tokenize(text, true);
    let mut window = VecDeque::new();
    window_matches(&mut window, phrase, &words)
}
