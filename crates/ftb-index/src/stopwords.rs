//! Stopword filtering for the tokenizer.
//!
//! Stopwords combine the English list from the `stop-words` crate (Stopwords
//! ISO) with any words configured in `[tokenizer]`. Stopwords are never indexed
//! and are dropped from queries, except inside phrases where they still take
//! part in the positional comparison.

use std::collections::HashSet;

use ftb_config::TokenizerSettings;
use stop_words::LANGUAGE;

/// A case-insensitive stopword set.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    /// Lowercased stopwords.
    words: HashSet<String>,
}

impl Stopwords {
    /// Creates an empty stopword set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a stopword set holding the built-in English list.
    pub fn english() -> Self {
        let mut stopwords = Self::none();
        stopwords.extend(stop_words::get(LANGUAGE::English));
        stopwords
    }

    /// Builds the stopword set described by tokenizer settings.
    pub fn from_settings(settings: &TokenizerSettings) -> Self {
        let mut stopwords = if settings.builtin_stopwords {
            Self::english()
        } else {
            Self::none()
        };
        stopwords.extend(&settings.stopwords);
        stopwords
    }

    /// Adds words to the set.
    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
    }

    /// Checks if a word is a stopword, ignoring case.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Returns the number of stopwords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if no stopwords are configured.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
