//! Query parser.
//!
//! Builds a [`QueryTree`] from the lexer's token stream. The tree is grown in
//! a single pass with a stack of open groups:
//!
//! ```text
//! word   → leaf under the innermost open group
//! open   → new expression under the innermost group, pushed on the stack
//! close  → pop the innermost group (ignored at the top level)
//! ```
//!
//! Required children (words or groups) increment their parent's `ythresh`.
//! Words that are not indexable are dropped, but inside a phrase every word is
//! still kept in the phrase list for positional verification.

use ftb_config::SearchSettings;
use ftb_index::Tokenizer;
use log::debug;

use crate::{
    ExprNode, Node, NodeId, NodeKind, Polarity, QueryError, QueryTree, ROOT, ROOT_CHAIN,
    TermNode,
    lexer::{Lexer, Modifiers, TokenKind},
    weight::weight_for,
};

/// Accumulates nodes while the query is read.
struct TreeBuilder {
    /// Nodes created so far.
    nodes: Vec<Node>,
    /// Open groups, innermost last. The root is always at the bottom.
    stack: Vec<NodeId>,
    /// Maximum group nesting.
    max_depth: usize,
}

impl TreeBuilder {
    /// Creates a builder holding only the root expression.
    fn new(max_depth: usize) -> Result<Self, QueryError> {
        let mut builder = Self {
            nodes: Vec::new(),
            stack: Vec::new(),
            max_depth,
        };
        builder.push_node(Node {
            polarity: Polarity::Required,
            weight: 1.0,
            parent: None,
            depth: 0,
            kind: NodeKind::Expr(empty_expr(false)),
        })?;
        builder.stack.push(ROOT);
        Ok(builder)
    }

    /// Returns the innermost open group.
    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(ROOT)
    }

    /// Returns the phrase list of the innermost group, if it is a phrase.
    fn current_phrase(&mut self) -> Option<&mut Vec<String>> {
        let id = self.current();
        match &mut self.nodes[id].kind {
            NodeKind::Expr(expr) => expr.phrase.as_mut(),
            NodeKind::Term(_) => None,
        }
    }

    /// Appends a node under the innermost group and returns its id.
    fn push_node(&mut self, node: Node) -> Result<NodeId, QueryError> {
        self.nodes
            .try_reserve(1)
            .map_err(|_| QueryError::Allocation)?;
        let id = self.nodes.len();
        let required = node.polarity == Polarity::Required;
        let parent = node.parent;
        self.nodes.push(node);

        if let Some(parent) = parent
            && let NodeKind::Expr(expr) = &mut self.nodes[parent].kind
        {
            expr.children
                .try_reserve(1)
                .map_err(|_| QueryError::Allocation)?;
            expr.children.push(id);
            if required {
                expr.ythresh += 1;
            }
        }
        Ok(id)
    }

    /// Depth of a node placed under the innermost group.
    fn child_depth(&self) -> u32 {
        u32::try_from(self.stack.len()).unwrap_or(u32::MAX)
    }

    /// Adds a word.
    fn add_word(
        &mut self,
        tokenizer: &dyn Tokenizer,
        text: &str,
        truncated: bool,
        modifiers: Modifiers,
    ) -> Result<(), QueryError> {
        let folded = tokenizer.fold(text);
        let in_phrase = match self.current_phrase() {
            Some(words) => {
                words
                    .try_reserve(1)
                    .map_err(|_| QueryError::Allocation)?;
                words.push(folded.clone());
                true
            }
            None => false,
        };

        let truncated = truncated && !in_phrase;
        let keep = if truncated {
            tokenizer.is_valid_prefix(&folded)
        } else {
            tokenizer.is_indexable(&folded)
        };
        if !keep {
            return Ok(());
        }

        let polarity = if in_phrase {
            Polarity::Required
        } else {
            modifiers.polarity
        };
        self.push_node(Node {
            polarity,
            weight: node_weight(polarity, modifiers),
            parent: Some(self.current()),
            depth: self.child_depth(),
            kind: NodeKind::Term(TermNode {
                text: folded,
                truncated,
                chain: ROOT_CHAIN,
                veto_level: 0,
            }),
        })?;
        Ok(())
    }

    /// Opens a group or phrase.
    fn open_group(
        &mut self,
        phrase: bool,
        modifiers: Modifiers,
        position: usize,
    ) -> Result<(), QueryError> {
        if self.stack.len() > self.max_depth {
            return Err(QueryError::TooDeep {
                max: self.max_depth,
                position,
            });
        }
        let id = self.push_node(Node {
            polarity: modifiers.polarity,
            weight: node_weight(modifiers.polarity, modifiers),
            parent: Some(self.current()),
            depth: self.child_depth(),
            kind: NodeKind::Expr(empty_expr(phrase)),
        })?;
        self.stack
            .try_reserve(1)
            .map_err(|_| QueryError::Allocation)?;
        self.stack.push(id);
        Ok(())
    }

    /// Closes the innermost group. A close at the top level is ignored.
    fn close_group(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Finishes the tree, closing any groups left open.
    fn finish(mut self) -> QueryTree {
        for node in &mut self.nodes {
            if let NodeKind::Expr(expr) = &mut node.kind
                && expr.phrase.as_ref().is_some_and(Vec::is_empty)
            {
                expr.phrase = None;
            }
        }
        QueryTree::from_nodes(self.nodes)
    }
}

/// Creates an expression payload with no children.
fn empty_expr(phrase: bool) -> ExprNode {
    ExprNode {
        children: Vec::new(),
        ythresh: 0,
        phrase: phrase.then(Vec::new),
    }
}

/// Weight factor for a node with the given polarity and modifiers.
fn node_weight(polarity: Polarity, modifiers: Modifiers) -> f64 {
    weight_for(
        modifiers.adjust,
        modifiers.negate || polarity == Polarity::Excluded,
    )
}

/// Parses a boolean query into a tree.
///
/// Operators follow `settings.boolean_syntax`; words are split, folded and
/// filtered by `tokenizer`. Unbalanced parentheses and quotes are tolerated.
pub fn parse(
    query: &str,
    tokenizer: &dyn Tokenizer,
    settings: &SearchSettings,
) -> Result<QueryTree, QueryError> {
    let mut builder = TreeBuilder::new(settings.max_depth)?;
    for token in Lexer::new(query, &settings.boolean_syntax, tokenizer) {
        match token.kind {
            TokenKind::Word { text, truncated } => {
                builder.add_word(tokenizer, &text, truncated, token.modifiers)?;
            }
            TokenKind::Open { phrase } => {
                builder.open_group(phrase, token.modifiers, token.offset)?;
            }
            TokenKind::Close => builder.close_group(),
        }
    }
    let tree = builder.finish();
    debug!(
        "parsed query {query:?}: {} nodes, {} leaves, {} chains",
        tree.len(),
        tree.leaves().len(),
        tree.chain_count()
    );
    Ok(tree)
}
