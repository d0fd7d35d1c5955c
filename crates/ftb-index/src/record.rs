//! Records and the record source contract.

use serde::{Deserialize, Serialize};

use crate::{DocId, IndexError};

/// A stored document: an id and its text-bearing fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Document identifier.
    pub id: DocId,
    /// Text fields. Each field is tokenized separately.
    #[serde(default)]
    pub fields: Vec<String>,
}

impl Record {
    /// Creates a record from an id and fields.
    pub fn new<I, S>(id: DocId, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Looks up records by document id.
pub trait RecordSource {
    /// Fetches a record. `Ok(None)` means the record no longer exists.
    fn fetch(&self, doc: DocId) -> Result<Option<Record>, IndexError>;
}

impl<T: RecordSource + ?Sized> RecordSource for &T {
    fn fetch(&self, doc: DocId) -> Result<Option<Record>, IndexError> {
        (**self).fetch(doc)
    }
}
