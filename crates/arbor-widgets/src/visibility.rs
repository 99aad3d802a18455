#![forbid(unsafe_code)]

//! Visibility resolution: collapse overrides plus filtering.
//!
//! # Design
//!
//! [`resolve_visible`] makes one left-to-right pass over the flat list.
//! Because pre-order keeps every subtree contiguous, at most one collapsed
//! subtree can be "open" at a time, so the pass tracks a single hidden
//! prefix instead of a set.
//!
//! For each entry:
//!
//! 1. If it lies under the current hidden prefix it is skipped. The filter
//!    is not evaluated and nothing is recorded.
//! 2. With a non-empty filter, entries the matcher rejects are skipped. A
//!    rejected entry is never recorded as collapsed, even when it is a
//!    collapsed branch, so its matching descendants still show up.
//! 3. Otherwise the entry is included. An included branch whose effective
//!    expanded state is `false` hides its whole subtree.
//!
//! # Filter semantics
//!
//! Filtering does not pull ancestors of a match into the result, and a
//! filtered-out collapsed branch does not suppress its descendants. With
//! tree `A(expanded) -> [B, C(expanded) -> [D]]` and filter `"D"` the
//! result is `[D]` alone. A collapsed branch that *matches* still hides its
//! subtree.
//!
//! # Invariants
//!
//! - The output is a subsequence of the input, order preserved.
//! - With an empty filter, collapsing path `p` removes exactly the entries
//!   strictly under `p`.
//! - With every branch expanded, extending a substring filter never grows
//!   the output. A collapsed branch that stops matching releases its
//!   subtree, so the count can grow when collapsed branches are involved.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::flatten::FlatEntry;
use crate::node::Node;
use crate::path::NodePath;

/// Sparse per-path expanded state, layered over each node's default.
pub type ExpandOverrides = BTreeMap<NodePath, bool>;

/// Caller-supplied filter predicate.
pub type FilterFn = Arc<dyn Fn(&Node, &str) -> bool + Send + Sync>;

/// How a non-empty filter string is matched against a node.
#[derive(Clone, Default)]
pub enum FilterMatcher {
    /// Case-insensitive substring match on the label.
    #[default]
    Substring,
    /// A custom predicate receiving the node and the raw filter text.
    Custom(FilterFn),
}

impl FilterMatcher {
    /// Wrap a predicate.
    #[must_use]
    pub fn custom(predicate: impl Fn(&Node, &str) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(predicate))
    }

    /// Whether `node` matches `filter`.
    #[must_use]
    pub fn matches(&self, node: &Node, filter: &str) -> bool {
        match self {
            Self::Substring => contains_ignore_case(node.label(), &filter.to_lowercase()),
            Self::Custom(predicate) => predicate(node, filter),
        }
    }
}

impl fmt::Debug for FilterMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substring => f.write_str("Substring"),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Effective expanded state of an entry.
#[must_use]
pub fn is_expanded(entry: &FlatEntry, overrides: &ExpandOverrides) -> bool {
    overrides
        .get(&entry.path)
        .copied()
        .unwrap_or_else(|| entry.node.is_expanded_default())
}

/// Indices into `flat` of the visible entries.
#[must_use]
pub fn resolve_visible_indices(
    flat: &[FlatEntry],
    overrides: &ExpandOverrides,
    filter: &str,
    matcher: &FilterMatcher,
) -> Vec<usize> {
    let span = tracing::trace_span!(
        "arbor.visibility",
        total = flat.len(),
        visible = tracing::field::Empty,
        filtered = tracing::field::Empty,
    );
    let _guard = span.enter();

    let needle = filter.to_lowercase();
    let mut hidden: Option<&NodePath> = None;
    let mut filtered = 0usize;
    let mut out = Vec::with_capacity(flat.len());

    for (index, entry) in flat.iter().enumerate() {
        if let Some(prefix) = hidden {
            if prefix.is_strict_prefix_of(&entry.path) {
                continue;
            }
            hidden = None;
        }

        if !filter.is_empty() {
            let keep = match matcher {
                FilterMatcher::Substring => contains_ignore_case(entry.node.label(), &needle),
                FilterMatcher::Custom(predicate) => predicate(&entry.node, filter),
            };
            if !keep {
                filtered += 1;
                continue;
            }
        }

        out.push(index);
        if entry.is_branch() && !is_expanded(entry, overrides) {
            hidden = Some(&entry.path);
        }
    }

    span.record("visible", out.len());
    span.record("filtered", filtered);
    out
}

/// Compute the visible subsequence of `flat`.
#[must_use]
pub fn resolve_visible(
    flat: &[FlatEntry],
    overrides: &ExpandOverrides,
    filter: &str,
    matcher: &FilterMatcher,
) -> Vec<FlatEntry> {
    resolve_visible_indices(flat, overrides, filter, matcher)
        .into_iter()
        .map(|i| flat[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten;

    fn scenario() -> Vec<Node> {
        vec![Node::new("A").with_expanded(true).with_children([
            Node::from("B"),
            Node::new("C").with_expanded(true).child("D"),
        ])]
    }

    fn labels(entries: &[FlatEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.node.label()).collect()
    }

    fn path(s: &str) -> NodePath {
        s.parse().expect("valid path")
    }

    #[test]
    fn default_state_shows_expanded_chain() {
        let flat = flatten(&scenario());
        let visible = resolve_visible(&flat, &ExpandOverrides::new(), "", &FilterMatcher::Substring);
        assert_eq!(labels(&visible), ["A", "B", "C", "D"]);
    }

    #[test]
    fn collapsing_c_hides_d() {
        let flat = flatten(&scenario());
        let mut overrides = ExpandOverrides::new();
        overrides.insert(path("/0/1"), false);
        let visible = resolve_visible(&flat, &overrides, "", &FilterMatcher::Substring);
        assert_eq!(labels(&visible), ["A", "B", "C"]);
    }

    #[test]
    fn filter_does_not_pull_up_ancestors() {
        let flat = flatten(&scenario());
        let visible = resolve_visible(&flat, &ExpandOverrides::new(), "D", &FilterMatcher::Substring);
        assert_eq!(labels(&visible), ["D"]);
    }

    #[test]
    fn filtered_out_collapsed_branch_does_not_hide_descendants() {
        let nodes = vec![Node::new("folder").child("target.txt")];
        let flat = flatten(&nodes);
        let visible = resolve_visible(&flat, &ExpandOverrides::new(), "target", &FilterMatcher::Substring);
        assert_eq!(labels(&visible), ["target.txt"]);
    }

    #[test]
    fn matching_collapsed_branch_still_hides_subtree() {
        let nodes = vec![Node::new("docs").child("docs-index")];
        let flat = flatten(&nodes);
        let visible = resolve_visible(&flat, &ExpandOverrides::new(), "docs", &FilterMatcher::Substring);
        assert_eq!(labels(&visible), ["docs"]);
    }

    #[test]
    fn substring_match_ignores_case() {
        let nodes = vec![Node::from("README.md"), Node::from("main.rs")];
        let flat = flatten(&nodes);
        let visible = resolve_visible(&flat, &ExpandOverrides::new(), "readme", &FilterMatcher::Substring);
        assert_eq!(labels(&visible), ["README.md"]);
    }

    #[test]
    fn custom_matcher_receives_raw_filter() {
        let nodes = vec![
            Node::new("one").with_badge("hot"),
            Node::new("two"),
            Node::new("three").with_badge("hot"),
        ];
        let flat = flatten(&nodes);
        let matcher = FilterMatcher::custom(|node, filter| node.badge() == Some(filter));
        let visible = resolve_visible(&flat, &ExpandOverrides::new(), "hot", &matcher);
        assert_eq!(labels(&visible), ["one", "three"]);
    }

    #[test]
    fn override_beats_default() {
        let nodes = vec![Node::new("root").with_expanded(true).child("leaf")];
        let flat = flatten(&nodes);
        let mut overrides = ExpandOverrides::new();
        assert!(is_expanded(&flat[0], &overrides));
        overrides.insert(path("/0"), false);
        assert!(!is_expanded(&flat[0], &overrides));
    }

    #[test]
    fn sibling_after_collapsed_subtree_is_visible() {
        let nodes = vec![
            Node::new("a").child(Node::new("a1").child("a11")),
            Node::from("b"),
        ];
        let flat = flatten(&nodes);
        let visible = resolve_visible(&flat, &ExpandOverrides::new(), "", &FilterMatcher::Substring);
        assert_eq!(labels(&visible), ["a", "b"]);
    }

    #[test]
    fn indices_match_entries() {
        let flat = flatten(&scenario());
        let indices = resolve_visible_indices(&flat, &ExpandOverrides::new(), "", &FilterMatcher::Substring);
        assert_eq!(indices, [0, 1, 2, 3]);
    }
}
