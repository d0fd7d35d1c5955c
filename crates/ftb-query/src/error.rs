//! Error types for query parsing.

use thiserror::Error;

/// Errors raised while building a query tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Groups or phrases are nested deeper than the configured limit.
    #[error("query nests groups deeper than {max} levels")]
    TooDeep {
        /// Configured maximum depth.
        max: usize,
        /// Byte position of the group that exceeded the limit.
        position: usize,
    },

    /// The query tree could not be allocated.
    #[error("out of memory while building the query tree")]
    Allocation,
}

impl QueryError {
    /// Returns the byte position in the query the error refers to, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::TooDeep { position, .. } => Some(*position),
            Self::Allocation => None,
        }
    }

    /// Formats the error with the query and a position indicator.
    pub fn format_with_context(&self, query: &str) -> String {
        let mut result = format!("query error: {self}\n  {query}");
        if let Some(pos) = self.position() {
            let column = query[..pos.min(query.len())].chars().count();
            result.push_str(&format!("\n  {}^", " ".repeat(column)));
        }
        if matches!(self, Self::TooDeep { .. }) {
            result.push_str("\nhint: remove redundant parentheses or raise search.max_depth");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_deep_display() {
        let err = QueryError::TooDeep {
            max: 2,
            position: 2,
        };
        assert_eq!(err.to_string(), "query nests groups deeper than 2 levels");
        assert_eq!(err.position(), Some(2));
    }

    #[test]
    fn context_points_at_position() {
        let err = QueryError::TooDeep {
            max: 2,
            position: 2,
        };
        let display = err.format_with_context("(((a)))");
        assert!(display.contains("(((a)))"));
        assert!(display.contains("\n    ^"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn allocation_has_no_position() {
        let err = QueryError::Allocation;
        assert_eq!(err.position(), None);
        assert!(!err.format_with_context("a").contains('^'));
    }
}
