#![forbid(unsafe_code)]

//! Hierarchical tree widget.
//!
//! [`Tree`] renders nodes with guide lines and expand glyphs, and supports
//! every navigation key. Search and multi-select follow the config.
//!
//! ```
//! use arbor_widgets::{Node, NavigatorConfig, Tree};
//!
//! let nodes = vec![Node::new("src").with_expanded(true).child("main.rs")];
//! let mut tree = Tree::try_new(nodes, NavigatorConfig::new()).unwrap();
//! let rows: Vec<String> = tree.render().iter().map(|r| r.text()).collect();
//! assert_eq!(rows, ["› ▼ src", "  └─  main.rs"]);
//! ```

use std::time::Duration;

use arbor_core::event::KeyEvent;

use crate::config::NavigatorConfig;
use crate::error::ConfigError;
use crate::flatten::FlatEntry;
use crate::mount::Interactive;
use crate::navigator::{NavPersistState, Navigator};
use crate::node::Node;
use crate::row::{RowFlags, RowLine, Span};

/// Expandable tree with guides.
#[derive(Debug)]
pub struct Tree {
    navigator: Navigator,
}

impl Tree {
    /// Validate `config` and build a tree over `nodes`.
    pub fn try_new<I, N>(nodes: I, config: NavigatorConfig) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Ok(Self {
            navigator: Navigator::try_new(nodes, config)?,
        })
    }

    /// Called when Enter activates a leaf.
    #[must_use]
    pub fn on_select(mut self, f: impl FnMut(&Node) + 'static) -> Self {
        self.navigator = self.navigator.on_select(f);
        self
    }

    /// Called when a branch expands or collapses.
    #[must_use]
    pub fn on_toggle(mut self, f: impl FnMut(&Node, bool) + 'static) -> Self {
        self.navigator = self.navigator.on_toggle(f);
        self
    }

    /// Called with all marked nodes when marks change.
    #[must_use]
    pub fn on_multi_select(mut self, f: impl FnMut(&[Node]) + 'static) -> Self {
        self.navigator = self.navigator.on_multi_select(f);
        self
    }

    /// Delegate label rendering.
    #[must_use]
    pub fn with_label_fn(
        mut self,
        f: impl Fn(&Node, RowFlags) -> Vec<Span> + Send + Sync + 'static,
    ) -> Self {
        self.navigator = self.navigator.with_label_fn(f);
        self
    }

    /// Apply one key event.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        self.navigator.handle_key(event)
    }

    /// Render the current window.
    pub fn render(&mut self) -> Vec<RowLine> {
        self.navigator.render()
    }

    /// Replace the nodes and reset navigation.
    pub fn set_nodes<I, N>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.navigator.set_nodes(nodes);
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn selected_entry(&self) -> Option<FlatEntry> {
        self.navigator.selected_entry()
    }

    /// Snapshot expansion, marks, filter, and cursor.
    #[must_use]
    pub fn save_state(&self) -> NavPersistState {
        self.navigator.save_state()
    }

    /// Restore a snapshot taken by [`Tree::save_state`].
    pub fn restore_state(&mut self, state: NavPersistState) {
        self.navigator.restore_state(state);
    }

    /// The underlying engine.
    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// The underlying engine, mutably.
    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }
}

impl Interactive for Tree {
    fn handle_key(&mut self, event: &KeyEvent) -> bool {
        self.navigator.handle_key(event)
    }

    fn tick(&mut self, dt: Duration) -> bool {
        self.navigator.tick(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::GuideStyle;
    use arbor_core::event::KeyCode;

    fn project() -> Vec<Node> {
        vec![
            Node::new("src").with_expanded(true).with_children([
                Node::new("widgets").with_children(["tree.rs", "list.rs"]),
                Node::from("lib.rs"),
            ]),
            Node::from("Cargo.toml"),
        ]
    }

    fn texts(tree: &mut Tree) -> Vec<String> {
        tree.render().iter().map(RowLine::text).collect()
    }

    #[test]
    fn renders_guides_and_glyphs() {
        let mut tree = Tree::try_new(project(), NavigatorConfig::new()).expect("config");
        assert_eq!(
            texts(&mut tree),
            [
                "\u{203A} \u{25BC} src",
                "  \u{251C}\u{2500}\u{25B6} widgets",
                "  \u{2514}\u{2500}  lib.rs",
                "    Cargo.toml",
            ]
        );
    }

    #[test]
    fn expanding_nested_branch_draws_continuation_guides() {
        let mut tree = Tree::try_new(project(), NavigatorConfig::new()).expect("config");
        tree.handle_key(&KeyEvent::new(KeyCode::Down));
        tree.handle_key(&KeyEvent::new(KeyCode::Right));
        let rows = texts(&mut tree);
        assert_eq!(rows[2], "  \u{2502} \u{251C}\u{2500}  tree.rs");
        assert_eq!(rows[3], "  \u{2502} \u{2514}\u{2500}  list.rs");
    }

    #[test]
    fn ascii_guides() {
        let mut tree = Tree::try_new(
            project(),
            NavigatorConfig::new().guide_style(GuideStyle::Ascii),
        )
        .expect("config");
        let rows = texts(&mut tree);
        assert_eq!(rows[1], "  +-\u{25B6} widgets");
        assert_eq!(rows[2], "  `-  lib.rs");
    }

    #[test]
    fn search_reaches_into_collapsed_branches() {
        let mut tree = Tree::try_new(
            project(),
            NavigatorConfig::new().searchable(true).collapse_all(true),
        )
        .expect("config");
        for c in "list".chars() {
            assert!(tree.handle_key(&KeyEvent::char(c)));
        }
        let labels: Vec<String> = tree
            .navigator()
            .visible_entries()
            .iter()
            .map(|e| e.node.label().to_owned())
            .collect();
        assert_eq!(labels, ["list.rs"]);
    }

    #[test]
    fn selected_entry_follows_cursor() {
        let mut tree = Tree::try_new(project(), NavigatorConfig::new()).expect("config");
        tree.handle_key(&KeyEvent::new(KeyCode::End));
        let entry = tree.selected_entry().expect("entry");
        assert_eq!(entry.node.label(), "Cargo.toml");
        assert_eq!(entry.path.to_string(), "/1");
    }
}
