//! Boolean query parsing for the ftb engine.
//!
//! The query language follows the classic boolean full-text syntax:
//!
//! - **Required**: `+apple` - must appear
//! - **Excluded**: `-rotten` - must not appear
//! - **Natural**: `apple` - optional, adds weight when present
//! - **Prefix**: `comp*` - any word starting with `comp`
//! - **Phrase**: `"fruit salad"` - words in order, next to each other
//! - **Grouping**: `+(apple pear)` - nested expressions
//! - **Weights**: `>apple`, `<pear`, `~plum` - raise, lower or negate weight
//!
//! Operator characters are configurable through
//! [`ftb_config::BooleanSyntax`].
//!
//! # Example
//!
//! ```
//! use ftb_config::SearchSettings;
//! use ftb_index::SimpleTokenizer;
//! use ftb_query::{ROOT, parse};
//!
//! let tree = parse("+apple -rotten", &SimpleTokenizer::default(), &SearchSettings::default()).unwrap();
//! assert_eq!(tree.ythresh(ROOT), 1);
//! assert_eq!(tree.leaves().len(), 2);
//! ```

#![warn(missing_docs)]

mod error;
mod lexer;
mod parser;
mod tree;
mod weight;

pub use error::QueryError;
pub use lexer::{Lexer, Modifiers, Token, TokenKind};
pub use parser::parse;
pub use tree::{
    ChainId, ExprNode, Node, NodeId, NodeKind, Polarity, QueryTree, ROOT, ROOT_CHAIN, TermNode,
};
pub use weight::{MAX_ADJUST, MIN_ADJUST, NEGATIVE_WEIGHTS, WEIGHTS, weight_for};
