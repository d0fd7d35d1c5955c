//! Error types for ftb configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use toml::de;

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration or stopword file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// The configured word length range is empty or starts at zero.
    #[error("invalid word length range: min {min}, max {max}")]
    InvalidWordLength {
        /// Configured minimum word length.
        min: usize,
        /// Configured maximum word length.
        max: usize,
    },

    /// The boolean operator syntax string is malformed.
    #[error("invalid boolean syntax '{syntax}': {reason}")]
    InvalidSyntax {
        /// The rejected syntax string.
        syntax: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The maximum group nesting depth must allow at least one level.
    #[error("max_depth must be at least 1")]
    InvalidDepth,
}
