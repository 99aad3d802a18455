#![forbid(unsafe_code)]

//! Positional node addresses.
//!
//! A [`NodePath`] is the chain of child indices from the root list to an
//! entry, written `/i0/i1/...`. Paths key every piece of per-entry state:
//! expand overrides and the multi-select set.
//!
//! # Invariants
//!
//! - Within one flatten pass every path is unique.
//! - Prefix tests are segment-wise: `/0/1` is a strict prefix of `/0/1/3`
//!   but not of `/0/10`.
//! - Ordering is lexicographic over segments, which is pre-order.
//!
//! # Limitations
//!
//! Paths are positional, not identity based. Inserting, removing, or
//! reordering siblings between renders shifts the paths of everything after
//! the edit, so overrides and selections stay attached to the *position*,
//! not to the node that used to live there. Hosts that mutate the node list
//! in place should re-key saved state (for example through [`Node::id`])
//! or call `set_nodes`, which resets derived state.
//!
//! [`Node::id`]: crate::node::Node::id

use std::fmt;
use std::str::FromStr;

/// Positional address of a flattened entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The empty path (the parent of every top-level node).
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from raw indices.
    #[must_use]
    pub fn from_indices(indices: impl Into<Vec<usize>>) -> Self {
        Self(indices.into())
    }

    /// Path of this node's `index`-th child.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(index);
        Self(segments)
    }

    /// Path of the parent, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.0.split_last()?;
        Some(Self(head.to_vec()))
    }

    /// The raw indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of segments. Top-level nodes have length 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `self` is an ancestor path of `other` (and not equal to it).
    #[must_use]
    pub fn is_strict_prefix_of(&self, other: &NodePath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

/// Error returned when a string is not a valid path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node path {input:?}")]
pub struct ParsePathError {
    input: String,
}

impl FromStr for NodePath {
    type Err = ParsePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let err = || ParsePathError {
            input: s.to_owned(),
        };
        let rest = s.strip_prefix('/').ok_or_else(err)?;
        rest.split('/')
            .map(|segment| segment.parse::<usize>().map_err(|_| err()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

#[cfg(feature = "config-file")]
impl serde::Serialize for NodePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "config-file")]
impl<'de> serde::Deserialize<'de> for NodePath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
