//! Configuration validation.
//!
//! Rejects settings the tokenizer and parser cannot work with.

use crate::{Config, ConfigError};

/// Validates a loaded configuration.
///
/// This checks that:
/// - the word length range is non-empty and starts at 1 or more
/// - at least one level of group nesting is allowed
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let tokenizer = &config.tokenizer;
    if tokenizer.min_word_length == 0 || tokenizer.min_word_length > tokenizer.max_word_length {
        return Err(ConfigError::InvalidWordLength {
            min: tokenizer.min_word_length,
            max: tokenizer.max_word_length,
        });
    }

    if config.search.max_depth == 0 {
        return Err(ConfigError::InvalidDepth);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn rejects_inverted_word_range() {
        let mut config = Config::default();
        config.tokenizer.min_word_length = 10;
        config.tokenizer.max_word_length = 5;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidWordLength { min: 10, max: 5 }
        ));
    }

    #[test]
    fn rejects_zero_min_length() {
        let mut config = Config::default();
        config.tokenizer.min_word_length = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_zero_depth() {
        let mut config = Config::default();
        config.search.max_depth = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidDepth)
        ));
    }
}
