//! Word tokenization.
//!
//! The [`Tokenizer`] trait is the contract the engine relies on for splitting
//! record text and query text into words, folding them for comparison, and
//! deciding which words are indexable. [`SimpleTokenizer`] is the reference
//! implementation:
//!
//! 1. a word is a run of alphanumeric characters or `_`, with at most one
//!    interior apostrophe (`don't`)
//! 2. words are folded to lowercase
//! 3. words outside the configured length range, and stopwords, are not indexed

use ftb_config::TokenizerSettings;

use crate::Stopwords;

/// A word produced by a tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// The folded word.
    pub text: String,
    /// Byte offset of the word in the source text.
    pub offset: usize,
}

/// Splits text into folded words.
pub trait Tokenizer {
    /// Returns true if `c` can be part of a word.
    fn is_word_char(&self, c: char) -> bool;

    /// Folds a word into its comparison form.
    fn fold(&self, word: &str) -> String;

    /// Returns true if a folded word is indexed.
    fn is_indexable(&self, word: &str) -> bool;

    /// Returns true if a folded word may be used as a prefix.
    ///
    /// Prefixes skip the minimum length and stopword checks.
    fn is_valid_prefix(&self, word: &str) -> bool;

    /// Returns the byte offset one past the end of the word starting at `start`.
    ///
    /// `start` must be the offset of a word character.
    fn word_end(&self, text: &str, start: usize) -> usize {
        let mut end = start;
        let mut seen_apostrophe = false;
        for (i, c) in text[start..].char_indices() {
            let pos = start + i;
            if self.is_word_char(c) {
                end = pos + c.len_utf8();
            } else if c == '\'' && !seen_apostrophe && end == pos && end > start {
                seen_apostrophe = true;
            } else {
                break;
            }
        }
        end
    }

    /// Splits `text` into folded words.
    ///
    /// With `keep_stopwords` every word is returned; otherwise only indexable
    /// words are.
    fn tokenize(&self, text: &str, keep_stopwords: bool) -> Vec<Word> {
        let mut words = Vec::new();
        let mut pos = 0;
        while let Some((i, _)) = text[pos..]
            .char_indices()
            .find(|&(_, c)| self.is_word_char(c))
        {
            let start = pos + i;
            let end = self.word_end(text, start);
            let folded = self.fold(&text[start..end]);
            if keep_stopwords || self.is_indexable(&folded) {
                words.push(Word {
                    text: folded,
                    offset: start,
                });
            }
            pos = end;
        }
        words
    }
}

/// Reference tokenizer configured from [`TokenizerSettings`].
#[derive(Debug, Clone)]
pub struct SimpleTokenizer {
    /// Minimum indexed word length in characters.
    min_word_length: usize,
    /// Maximum indexed word length in characters.
    max_word_length: usize,
    /// Words that are never indexed.
    stopwords: Stopwords,
}

impl SimpleTokenizer {
    /// Creates a tokenizer from settings.
    pub fn new(settings: &TokenizerSettings) -> Self {
        Self {
            min_word_length: settings.min_word_length,
            max_word_length: settings.max_word_length,
            stopwords: Stopwords::from_settings(settings),
        }
    }

    /// Creates a tokenizer with an explicit length range and stopword set.
    pub fn with_stopwords(min_word_length: usize, max_word_length: usize, stopwords: Stopwords) -> Self {
        Self {
            min_word_length,
            max_word_length,
            stopwords,
        }
    }

    /// Returns the stopword set.
    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }
}

impl Default for SimpleTokenizer {
    fn default() -> Self {
        Self::new(&TokenizerSettings::default())
    }
}

impl Tokenizer for SimpleTokenizer {
    fn is_word_char(&self, c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }

    fn fold(&self, word: &str) -> String {
        word.to_lowercase()
    }

    fn is_indexable(&self, word: &str) -> bool {
        let len = word.chars().count();
        len >= self.min_word_length && len <= self.max_word_length && !self.stopwords.contains(word)
    }

    fn is_valid_prefix(&self, word: &str) -> bool {
        let len = word.chars().count();
        len > 0 && len <= self.max_word_length
    }
}
