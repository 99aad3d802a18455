#![forbid(unsafe_code)]

//! Pre-order flattening and guide-line prefixes.
//!
//! [`flatten`] walks the whole node forest depth-first and produces one
//! [`FlatEntry`] per node. It knows nothing about collapse state or
//! filtering; that is the visibility resolver's job. The output is cached
//! by the navigator and only recomputed when the node list is replaced.
//!
//! # Invariants
//!
//! 1. Output order is pre-order DFS order.
//! 2. `entry.path.len() == entry.depth + 1`.
//! 3. `entry.ancestor_is_last.len() == entry.depth`.
//! 4. Paths are unique within one output.

use std::str::FromStr;

use crate::node::Node;
use crate::path::NodePath;

/// One node of the flattened forest.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    /// The source node.
    pub node: Node,
    /// Nesting depth; top-level nodes are 0.
    pub depth: usize,
    /// Positional address.
    pub path: NodePath,
    /// Whether this is the last child of its parent.
    pub is_last_sibling: bool,
    /// Last-sibling flags of each ancestor, outermost first.
    pub ancestor_is_last: Vec<bool>,
}

impl FlatEntry {
    /// Whether the node has children.
    #[must_use]
    pub fn is_branch(&self) -> bool {
        self.node.has_children()
    }
}

/// Flatten a node forest in pre-order.
#[must_use]
pub fn flatten(nodes: &[Node]) -> Vec<FlatEntry> {
    let mut out = Vec::with_capacity(nodes.iter().map(Node::total_count).sum());
    let mut ancestors = Vec::new();
    walk(nodes, &NodePath::root(), &mut ancestors, &mut out);
    out
}

fn walk(nodes: &[Node], parent: &NodePath, ancestors: &mut Vec<bool>, out: &mut Vec<FlatEntry>) {
    let last = nodes.len().saturating_sub(1);
    for (index, node) in nodes.iter().enumerate() {
        let is_last_sibling = index == last;
        let path = parent.child(index);
        out.push(FlatEntry {
            node: node.clone(),
            depth: ancestors.len(),
            path: path.clone(),
            is_last_sibling,
            ancestor_is_last: ancestors.clone(),
        });
        if node.has_children() {
            ancestors.push(is_last_sibling);
            walk(node.children(), &path, ancestors, out);
            ancestors.pop();
        }
    }
}

// ============================================================================
// Guides
// ============================================================================

/// Guide character set for tree connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "config-file",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum GuideStyle {
    /// `|`, `+`, `` ` ``, `-`.
    Ascii,
    /// `│`, `├`, `└`, `─` (default).
    #[default]
    Unicode,
}

impl GuideStyle {
    /// Vertical continuation glyph.
    #[must_use]
    pub const fn vertical(&self) -> char {
        match self {
            Self::Ascii => '|',
            Self::Unicode => '\u{2502}',
        }
    }

    /// Connector for a child with siblings below.
    #[must_use]
    pub const fn branch(&self) -> char {
        match self {
            Self::Ascii => '+',
            Self::Unicode => '\u{251C}',
        }
    }

    /// Connector for the last child.
    #[must_use]
    pub const fn last(&self) -> char {
        match self {
            Self::Ascii => '`',
            Self::Unicode => '\u{2514}',
        }
    }

    /// Horizontal fill.
    #[must_use]
    pub const fn horizontal(&self) -> char {
        match self {
            Self::Ascii => '-',
            Self::Unicode => '\u{2500}',
        }
    }
}

impl FromStr for GuideStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascii" => Ok(Self::Ascii),
            "unicode" => Ok(Self::Unicode),
            other => Err(format!("unknown guide style {other:?}")),
        }
    }
}

/// Build the connector prefix for `entry`.
///
/// Each depth level contributes `indent_size` columns. Top-level entries get
/// an empty prefix.
#[must_use]
pub fn guide_prefix(entry: &FlatEntry, style: GuideStyle, indent_size: usize) -> String {
    if entry.depth == 0 || indent_size == 0 {
        return String::new();
    }
    let mut out = String::with_capacity(entry.depth * indent_size * 3);
    // The outermost ancestor is a top-level node, which draws no column.
    for &ancestor_last in entry.ancestor_is_last.iter().skip(1) {
        out.push(if ancestor_last { ' ' } else { style.vertical() });
        out.extend(std::iter::repeat_n(' ', indent_size - 1));
    }
    out.push(if entry.is_last_sibling {
        style.last()
    } else {
        style.branch()
    });
    out.extend(std::iter::repeat_n(style.horizontal(), indent_size - 1));
    out
}

/// Plain indentation used when guides are disabled.
#[must_use]
pub fn plain_indent(depth: usize, indent_size: usize) -> String {
    " ".repeat(depth.saturating_mul(indent_size))
}
