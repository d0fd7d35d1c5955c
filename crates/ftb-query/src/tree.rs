//! Query tree.
//!
//! A parsed query is an arena of [`Node`]s addressed by [`NodeId`]. Node 0 is
//! the root expression. The shape never changes after parsing; evaluation
//! state lives with the search that walks the tree.

use std::{fmt, iter};

/// Index of a node in its [`QueryTree`].
pub type NodeId = usize;

/// The root expression of every tree.
pub const ROOT: NodeId = 0;

/// A high-water-mark chain: the leaves hanging under one maximal run of
/// required expressions share a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(pub usize);

/// The chain ending at the root.
pub const ROOT_CHAIN: ChainId = ChainId(0);

/// How a node takes part in its parent's match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// The node must match (`+`).
    Required,
    /// The node must not match (`-`).
    Excluded,
    /// The node contributes weight when it matches.
    Natural,
}

/// A node of the query tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Polarity as seen by the parent.
    pub polarity: Polarity,
    /// Weight factor from the weight tables.
    pub weight: f64,
    /// Parent expression; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Number of ancestors.
    pub depth: u32,
    /// Variant payload.
    pub kind: NodeKind,
}

/// Term or expression payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A leaf word.
    Term(TermNode),
    /// A group or phrase.
    Expr(ExprNode),
}

/// A leaf word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermNode {
    /// Folded word or prefix.
    pub text: String,
    /// Whether the word matches as a prefix (`word*`).
    pub truncated: bool,
    /// High-water-mark chain the leaf belongs to.
    pub chain: ChainId,
    /// One more than the depth of the deepest excluded node on the path from
    /// the leaf to the root, or 0 when nothing on the path is excluded.
    ///
    /// Leaves with a higher level are evaluated first for the same document,
    /// so vetoes land before positive matches can complete an expression.
    pub veto_level: u32,
}

/// A group or phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprNode {
    /// Child nodes in query order.
    pub children: Vec<NodeId>,
    /// Number of required children.
    pub ythresh: u32,
    /// Folded phrase words, stopwords included, for quoted groups.
    pub phrase: Option<Vec<String>>,
}

/// A parsed boolean query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTree {
    /// All nodes; the root is at [`ROOT`].
    nodes: Vec<Node>,
    /// Leaf ids sorted by text ascending, then depth descending.
    leaves: Vec<NodeId>,
    /// Number of distinct chains.
    chains: usize,
}

impl QueryTree {
    /// Builds a tree from nodes whose parents precede them.
    ///
    /// Leaf chains and veto levels are derived here, so the values the caller
    /// put in those fields are ignored.
    pub fn from_nodes(mut nodes: Vec<Node>) -> Self {
        let mut chain_of: Vec<Option<ChainId>> = vec![None; nodes.len()];
        if let Some(root) = chain_of.first_mut() {
            *root = Some(ROOT_CHAIN);
        }
        let mut chains = 1;
        let mut leaves = Vec::new();

        for id in 0..nodes.len() {
            let NodeKind::Term(_) = nodes[id].kind else {
                continue;
            };
            let Some(parent) = nodes[id].parent else {
                continue;
            };

            // The chain belongs to the topmost expression reachable through
            // required expressions.
            let mut top = parent;
            while let Some(up) = nodes[top].parent {
                if nodes[top].polarity != Polarity::Required {
                    break;
                }
                top = up;
            }
            let chain = *chain_of[top].get_or_insert_with(|| {
                chains += 1;
                ChainId(chains - 1)
            });

            let mut veto_level = 0;
            let mut cur = Some(id);
            while let Some(n) = cur {
                if nodes[n].parent.is_some() && nodes[n].polarity == Polarity::Excluded {
                    veto_level = nodes[n].depth + 1;
                    break;
                }
                cur = nodes[n].parent;
            }

            if let NodeKind::Term(term) = &mut nodes[id].kind {
                term.chain = chain;
                term.veto_level = veto_level;
            }
            leaves.push(id);
        }

        leaves.sort_by(|&a, &b| {
            let text = |id: NodeId| match &nodes[id].kind {
                NodeKind::Term(t) => t.text.as_str(),
                NodeKind::Expr(_) => "",
            };
            text(a)
                .cmp(text(b))
                .then_with(|| nodes[b].depth.cmp(&nodes[a].depth))
        });

        Self {
            nodes,
            leaves,
            chains,
        }
    }

    /// Returns a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Returns all nodes in id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the query has no leaves.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Returns the leaf payload of a node.
    pub fn term(&self, id: NodeId) -> Option<&TermNode> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Term(term) => Some(term),
            NodeKind::Expr(_) => None,
        }
    }

    /// Returns the expression payload of a node.
    pub fn expr(&self, id: NodeId) -> Option<&ExprNode> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Expr(expr) => Some(expr),
            NodeKind::Term(_) => None,
        }
    }

    /// Returns the required-child count of an expression, 0 for leaves.
    pub fn ythresh(&self, id: NodeId) -> u32 {
        self.expr(id).map_or(0, |e| e.ythresh)
    }

    /// Returns leaf ids sorted by text, then depth descending.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Returns the leaves whose text equals `text`, deepest first.
    pub fn leaves_with_text(&self, text: &str) -> &[NodeId] {
        let start = self
            .leaves
            .partition_point(|&id| self.leaf_text(id) < text);
        let len = self.leaves[start..].partition_point(|&id| self.leaf_text(id) == text);
        &self.leaves[start..start + len]
    }

    /// Returns the number of high-water-mark chains.
    pub fn chain_count(&self) -> usize {
        self.chains
    }

    /// Returns true if any expression carries a phrase.
    pub fn has_phrase(&self) -> bool {
        self.nodes
            .iter()
            .any(|n| matches!(&n.kind, NodeKind::Expr(e) if e.phrase.is_some()))
    }

    /// Returns the ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.nodes[id].parent, |&p| self.nodes[p].parent)
    }

    /// Returns a leaf's text, or the empty string for expressions.
    fn leaf_text(&self, id: NodeId) -> &str {
        self.term(id).map_or("", |t| t.text.as_str())
    }

    /// Formats the subtree at `id` with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        let node = &self.nodes[id];
        let sign = match node.polarity {
            Polarity::Required => "+",
            Polarity::Excluded => "-",
            Polarity::Natural => "",
        };
        match &node.kind {
            NodeKind::Term(term) => {
                let star = if term.truncated { "*" } else { "" };
                writeln!(f, "{prefix}{sign}Term({:?}{star}) w={}", term.text, node.weight)
            }
            NodeKind::Expr(expr) => {
                match &expr.phrase {
                    Some(words) => writeln!(f, "{prefix}{sign}Phrase({words:?}) w={}", node.weight)?,
                    None => writeln!(f, "{prefix}{sign}Expr w={} ythresh={}", node.weight, expr.ythresh)?,
                }
                for &child in &expr.children {
                    self.fmt_tree(f, child, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for QueryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, ROOT, 0)
    }
}
