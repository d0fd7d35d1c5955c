//! Configuration for the ftb boolean full-text engine.
//!
//! Configuration lives in a TOML file (conventionally `ftb.toml`) with two
//! sections: `[tokenizer]` controls how text is split into indexable words, and
//! `[search]` controls the boolean query language.

#![warn(missing_docs)]

mod error;
mod parse;
mod syntax;
mod validate;

use std::path::{Path, PathBuf};

pub use error::ConfigError;
pub use parse::{parse_config_file, parse_config_str, read_stopword_file};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
pub use syntax::{BooleanSyntax, DEFAULT_BOOLEAN_SYNTAX};
pub use validate::validate_config;

/// Conventional configuration file name.
pub const CONFIG_FILENAME: &str = "ftb.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Word splitting and filtering.
    pub tokenizer: TokenizerSettings,
    /// Boolean query language settings.
    pub search: SearchSettings,
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = parse_config_file(path)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    pub fn settings_to_toml(&self) -> String {
        toml::to_string_pretty(self).expect("settings serialization should not fail")
    }
}

/// Settings for splitting text into indexable words.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenizerSettings {
    /// Words shorter than this (in characters) are not indexed.
    pub min_word_length: usize,
    /// Words longer than this (in characters) are not indexed.
    pub max_word_length: usize,
    /// Whether the built-in English stopword list is active.
    pub builtin_stopwords: bool,
    /// Additional stopwords.
    pub stopwords: Vec<String>,
    /// File with additional stopwords, one per line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopword_file: Option<PathBuf>,
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self {
            min_word_length: 4,
            max_word_length: 84,
            builtin_stopwords: true,
            stopwords: Vec::new(),
            stopword_file: None,
        }
    }
}

/// Settings for the boolean query language.
#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Operator characters, see [`BooleanSyntax`].
    #[serde_as(as = "DisplayFromStr")]
    pub boolean_syntax: BooleanSyntax,
    /// Maximum nesting depth of groups and phrases.
    pub max_depth: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            boolean_syntax: BooleanSyntax::default(),
            max_depth: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_settings_defaults() {
        let tokenizer = TokenizerSettings::default();
        assert_eq!(tokenizer.min_word_length, 4);
        assert_eq!(tokenizer.max_word_length, 84);
        assert!(tokenizer.builtin_stopwords);
        assert!(tokenizer.stopwords.is_empty());
        assert!(tokenizer.stopword_file.is_none());
    }

    #[test]
    fn test_search_settings_defaults() {
        let search = SearchSettings::default();
        assert_eq!(search.boolean_syntax.to_string(), DEFAULT_BOOLEAN_SYNTAX);
        assert_eq!(search.max_depth, 64);
    }

    #[test]
    fn test_settings_to_toml() {
        let toml = Config::default().settings_to_toml();

        assert!(toml.contains("[tokenizer]"));
        assert!(toml.contains("[search]"));
        assert!(toml.contains("min_word_length = 4"));
        assert!(toml.contains("max_depth = 64"));

        let parsed = parse_config_str(&toml, Path::new("roundtrip.toml"))
            .expect("settings_to_toml should produce valid TOML");
        assert_eq!(parsed.tokenizer.max_word_length, 84);
        assert_eq!(
            parsed.search.boolean_syntax.to_string(),
            DEFAULT_BOOLEAN_SYNTAX
        );
    }
}
