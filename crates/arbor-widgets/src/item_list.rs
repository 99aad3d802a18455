#![forbid(unsafe_code)]

//! Flat selectable list.
//!
//! [`ItemList`] drops any children it is given, so every row is a leaf at
//! depth 0. Guides and the expand glyph column are turned off.

use std::time::Duration;

use arbor_core::event::KeyEvent;

use crate::config::NavigatorConfig;
use crate::error::ConfigError;
use crate::mount::Interactive;
use crate::navigator::{NavPersistState, Navigator};
use crate::node::Node;
use crate::row::{RowFlags, RowLine, Span};

/// Single-level list widget.
#[derive(Debug)]
pub struct ItemList {
    navigator: Navigator,
}

fn leaves<I, N>(items: I) -> impl Iterator<Item = Node>
where
    I: IntoIterator<Item = N>,
    N: Into<Node>,
{
    items
        .into_iter()
        .map(|item| Into::<Node>::into(item).with_children(Vec::<Node>::new()))
}

impl ItemList {
    /// Validate `config` and build a list over `items`.
    pub fn try_new<I, N>(items: I, config: NavigatorConfig) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        let config = config.show_guides(false);
        let mut navigator = Navigator::try_new(leaves(items), config)?;
        navigator.set_expand_glyph(false);
        Ok(Self { navigator })
    }

    /// Called when Enter activates an item.
    #[must_use]
    pub fn on_select(mut self, f: impl FnMut(&Node) + 'static) -> Self {
        self.navigator = self.navigator.on_select(f);
        self
    }

    /// Called with every marked item when marks change.
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

    /// Replace the items and reset navigation.
    pub fn set_items<I, N>(&mut self, items: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.navigator.set_nodes(leaves(items));
    }

    /// Item under the cursor.
    #[must_use]
    pub fn selected(&self) -> Option<Node> {
        self.navigator.selected_entry().map(|entry| entry.node)
    }

    /// Marked items in list order.
    #[must_use]
    pub fn marked(&self) -> Vec<Node> {
        self.navigator.marked_nodes()
    }

    /// Snapshot marks, filter, and cursor.
    #[must_use]
    pub fn save_state(&self) -> NavPersistState {
        self.navigator.save_state()
    }

    /// Restore a snapshot.
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

impl Interactive for ItemList {
    fn handle_key(&mut self, event: &KeyEvent) -> bool {
        self.navigator.handle_key(event)
    }

    fn tick(&mut self, dt: Duration) -> bool {
        self.navigator.tick(dt)
    }
}
