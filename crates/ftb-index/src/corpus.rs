//! JSON corpus files.
//!
//! A corpus is a list of records stored as JSON:
//!
//! ```json
//! { "documents": [ { "id": 1, "fields": ["title", "body"] } ] }
//! ```

use std::{fs, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{IndexError, MemoryIndex, Record, Tokenizer};

/// A set of records loaded from or saved to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    /// Records in the corpus.
    #[serde(default)]
    pub documents: Vec<Record>,
}

impl Corpus {
    /// Creates an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a corpus from a JSON file.
    ///
    /// Returns an empty corpus if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path)?;
        let corpus: Self = serde_json::from_str(&contents)?;
        debug!(
            "loaded {} records from {}",
            corpus.documents.len(),
            path.display()
        );
        Ok(corpus)
    }

    /// Saves the corpus as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Adds a record.
    pub fn push(&mut self, record: Record) {
        self.documents.push(record);
    }

    /// Builds an in-memory index over the corpus.
    pub fn index(&self, tokenizer: &dyn Tokenizer) -> MemoryIndex {
        MemoryIndex::from_records(self.documents.iter().cloned(), tokenizer)
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the corpus has no records.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
