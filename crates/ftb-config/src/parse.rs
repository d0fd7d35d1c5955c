//! Configuration file parsing.
//!
//! Parses `ftb.toml` files into a [`Config`], resolving the optional stopword
//! file relative to the configuration file's directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{Config, ConfigError};

/// Parses a configuration file from disk.
///
/// A `stopword_file` entry is resolved against the directory containing `path`
/// and its words are appended to the configured stopword list.
pub fn parse_config_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = parse_config_str(&contents, path)?;
    if let Some(file) = config.tokenizer.stopword_file.take() {
        let resolved = resolve_relative(path, &file);
        let words = read_stopword_file(&resolved)?;
        config.tokenizer.stopwords.extend(words);
        config.tokenizer.stopword_file = Some(resolved);
    }
    Ok(config)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting. Stopword files are not
/// read; use [`parse_config_file`] for that.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a stopword file: one word per line, blank lines and `#` comments ignored.
pub fn read_stopword_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

/// Resolves `target` against the directory of `config_path` unless it is absolute.
fn resolve_relative(config_path: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        return target.to_path_buf();
    }
    config_path
        .parent()
        .map_or_else(|| target.to_path_buf(), |dir| dir.join(target))
}
