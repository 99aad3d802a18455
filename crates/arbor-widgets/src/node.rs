#![forbid(unsafe_code)]

//! Immutable node model.
//!
//! A [`Node`] describes one entry of the source hierarchy: a tree item, a
//! list item, or a todo. Nodes are immutable values. Children live behind
//! shared storage, so the builder methods return a new node that shares
//! every subtree it did not touch.
//!
//! # Example
//!
//! ```
//! use arbor_widgets::node::Node;
//!
//! let src = Node::new("src")
//!     .child(Node::new("main.rs"))
//!     .child(Node::new("lib.rs"))
//!     .with_expanded(true);
//! let root = Node::new("project").child(src).child("Cargo.toml");
//!
//! assert_eq!(root.children().len(), 2);
//! assert!(root.children()[0].is_expanded_default());
//! assert_eq!(root.total_count(), 5);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

type Payload = Arc<dyn Any + Send + Sync>;

/// One entry of the source hierarchy.
#[derive(Clone)]
pub struct Node {
    label: String,
    children: Arc<[Node]>,
    expanded_default: bool,
    icon: Option<String>,
    badge: Option<String>,
    value: Option<Payload>,
    id: Option<String>,
}

impl Node {
    /// Create a leaf node with the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Arc::from(Vec::new()),
            expanded_default: false,
            icon: None,
            badge: None,
            value: None,
            id: None,
        }
    }

    /// Return a copy with `node` appended to the children.
    #[must_use]
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        let mut children = self.children.to_vec();
        children.push(node.into());
        self.children = Arc::from(children);
        self
    }

    /// Return a copy with the given children.
    #[must_use]
    pub fn with_children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children = nodes.into_iter().map(Into::into).collect();
        self
    }

    /// Return a copy whose default expanded state is `expanded`.
    #[must_use]
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded_default = expanded;
        self
    }

    /// Set an icon rendered before the label.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set a badge rendered after the label.
    #[must_use]
    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    /// Attach an opaque payload.
    #[must_use]
    pub fn with_value<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.value = Some(Arc::new(value));
        self
    }

    /// Set a caller-defined identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The children, in order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Whether this node is a branch (has at least one child).
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Expanded state used when no override exists for this node.
    #[must_use]
    pub fn is_expanded_default(&self) -> bool {
        self.expanded_default
    }

    /// Optional icon.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Optional badge.
    #[must_use]
    pub fn badge(&self) -> Option<&str> {
        self.badge.as_deref()
    }

    /// Optional caller-defined identifier.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Downcast the payload to `T`.
    #[must_use]
    pub fn value_as<T: Any>(&self) -> Option<&T> {
        self.value.as_deref().and_then(|v| v.downcast_ref::<T>())
    }

    /// Whether a payload is attached.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Whether `self` and `other` share the same child storage.
    #[must_use]
    pub fn shares_children_with(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.children, &other.children)
    }

    /// Count this node and all descendants.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.children
            .iter()
            .fold(1usize, |acc, child| acc.saturating_add(child.total_count()))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let same_value = match (&self.value, &other.value) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_value
            && self.label == other.label
            && self.expanded_default == other.expanded_default
            && self.icon == other.icon
            && self.badge == other.badge
            && self.id == other.id
            && (Arc::ptr_eq(&self.children, &other.children) || self.children == other.children)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Node");
        s.field("label", &self.label);
        if !self.children.is_empty() {
            s.field("children", &self.children);
        }
        s.field("expanded_default", &self.expanded_default);
        if let Some(icon) = &self.icon {
            s.field("icon", icon);
        }
        if let Some(badge) = &self.badge {
            s.field("badge", badge);
        }
        if let Some(id) = &self.id {
            s.field("id", id);
        }
        if self.value.is_some() {
            s.field("value", &"<opaque>");
        }
        s.finish()
    }
}

impl From<&str> for Node {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Node {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

/// Build a node list from labels or nodes.
///
/// ```
/// use arbor_widgets::node::{Node, nodes};
///
/// let list = nodes(["alpha", "beta"]);
/// assert_eq!(list[1].label(), "beta");
/// let mixed: Vec<Node> = nodes(vec![Node::new("dir").child("file"), Node::from("loose")]);
/// assert!(mixed[0].has_children());
/// ```
pub fn nodes<I, N>(inputs: I) -> Vec<Node>
where
    I: IntoIterator<Item = N>,
    N: Into<Node>,
{
    inputs.into_iter().map(Into::into).collect()
}

// ============================================================================
// Serialized node input
// ============================================================================

/// Serialized form of a node: either a bare label or a full record.
///
/// ```json
/// ["README.md", {"label": "src", "expanded": true, "children": ["main.rs"]}]
/// ```
#[cfg(feature = "config-file")]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    /// A leaf with only a label.
    Label(String),
    /// A full node record.
    Record {
        /// Label text.
        label: String,
        /// Child entries.
        #[serde(default)]
        children: Vec<NodeSpec>,
        /// Default expanded state.
        #[serde(default)]
        expanded: bool,
        /// Optional icon.
        #[serde(default)]
        icon: Option<String>,
        /// Optional badge.
        #[serde(default)]
        badge: Option<String>,
        /// Optional identifier.
        #[serde(default)]
        id: Option<String>,
    },
}

#[cfg(feature = "config-file")]
impl From<NodeSpec> for Node {
    fn from(input: NodeSpec) -> Self {
        match input {
            NodeSpec::Label(label) => Node::new(label),
            NodeSpec::Record {
                label,
                children,
                expanded,
                icon,
                badge,
                id,
            } => {
                let mut node = Node::new(label)
                    .with_children(children)
                    .with_expanded(expanded);
                node.icon = icon;
                node.badge = badge;
                node.id = id;
                node
            }
        }
    }
}

/// Parse a JSON array of [`NodeSpec`] values.
#[cfg(feature = "config-file")]
pub fn nodes_from_json(s: &str) -> Result<Vec<Node>, crate::error::ConfigError> {
    let inputs: Vec<NodeSpec> = serde_json::from_str(s)?;
    Ok(nodes(inputs))
}

/// Parse a TOML document whose `nodes` key holds an array of [`NodeSpec`] values.
#[cfg(feature = "config-file")]
pub fn nodes_from_toml(s: &str) -> Result<Vec<Node>, crate::error::ConfigError> {
    #[derive(serde::Deserialize)]
    struct Document {
        #[serde(default)]
        nodes: Vec<NodeSpec>,
    }
    let doc: Document = toml::from_str(s)?;
    Ok(nodes(doc.nodes))
}
