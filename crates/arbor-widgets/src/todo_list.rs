#![forbid(unsafe_code)]

//! Checklist widget.
//!
//! [`TodoList`] forces multi-select on and treats the marked set as the
//! "done" set. Tab, Space, and Enter on a leaf all toggle done. Enter on a
//! branch still expands or collapses it, so todos can be grouped.

use std::time::Duration;

use arbor_core::event::KeyEvent;

use crate::config::NavigatorConfig;
use crate::error::ConfigError;
use crate::mount::Interactive;
use crate::navigator::{NavPersistState, Navigator};
use crate::node::Node;
use crate::row::{RowFlags, RowLine, Span};

/// Multi-select checklist.
#[derive(Debug)]
pub struct TodoList {
    navigator: Navigator,
}

impl TodoList {
    /// Validate `config` and build a checklist over `items`.
    ///
    /// `multi_select` is always enabled, whatever `config` says.
    pub fn try_new<I, N>(items: I, config: NavigatorConfig) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        let mut navigator = Navigator::try_new(items, config.multi_select(true))?;
        navigator.set_enter_marks_leaf(true);
        Ok(Self { navigator })
    }

    /// Called with every done item, in order, whenever the done set changes.
    #[must_use]
    pub fn on_change(mut self, f: impl FnMut(&[Node]) + 'static) -> Self {
        self.navigator = self.navigator.on_multi_select(f);
        self
    }

    /// Called when Enter activates a leaf.
    #[must_use]
    pub fn on_select(mut self, f: impl FnMut(&Node) + 'static) -> Self {
        self.navigator = self.navigator.on_select(f);
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

    /// Replace the items. The done set is cleared.
    pub fn set_items<I, N>(&mut self, items: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.navigator.set_nodes(items);
    }

    /// Done items in order.
    #[must_use]
    pub fn done(&self) -> Vec<Node> {
        self.navigator.marked_nodes()
    }

    /// `(done, total)` over every leaf item, visible or not.
    ///
    /// Group rows are not todos: a branch marked with Tab or Space shows a
    /// checked box but is counted in neither number.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        self.navigator.state_cell().with(|state| {
            self.navigator
                .flat()
                .iter()
                .filter(|entry| !entry.is_branch())
                .fold((0, 0), |(done, total), entry| {
                    (done + usize::from(state.is_marked(&entry.path)), total + 1)
                })
        })
    }

    /// Snapshot the done set, expansion, filter, and cursor.
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

impl Interactive for TodoList {
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
    use arbor_core::event::KeyCode;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn chores() -> Vec<&'static str> {
        vec!["dishes", "laundry", "groceries"]
    }

    #[test]
    fn multi_select_is_forced_on() {
        let list = TodoList::try_new(chores(), NavigatorConfig::new().multi_select(false))
            .expect("config");
        assert!(list.navigator().config().multi_select);
    }

    #[test]
    fn enter_toggles_done_and_reports() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut list = TodoList::try_new(chores(), NavigatorConfig::new())
            .expect("config")
            .on_change(move |done| sink.borrow_mut().push(done.len()));

        assert!(list.handle_key(&KeyEvent::new(KeyCode::Enter)));
        assert_eq!(list.progress(), (1, 3));
        assert!(list.handle_key(&KeyEvent::new(KeyCode::Down)));
        assert!(list.handle_key(&KeyEvent::char(' ')));
        assert_eq!(list.progress(), (2, 3));
        assert!(list.handle_key(&KeyEvent::new(KeyCode::Up)));
        assert!(list.handle_key(&KeyEvent::new(KeyCode::Enter)));
        assert_eq!(list.progress(), (1, 3));
        assert_eq!(*seen.borrow(), [1, 2, 1]);

        let labels: Vec<String> = list.done().iter().map(|n| n.label().to_owned()).collect();
        assert_eq!(labels, ["laundry"]);
    }

    #[test]
    fn done_rows_show_checked_boxes() {
        let mut list = TodoList::try_new(chores(), NavigatorConfig::new()).expect("config");
        list.handle_key(&KeyEvent::new(KeyCode::Tab));
        let rows: Vec<String> = list.render().iter().map(RowLine::text).collect();
        assert_eq!(rows[0], "[x] \u{203A}   dishes");
        assert_eq!(rows[1], "[ ]     laundry");
    }

    #[test]
    fn grouped_todos_expand_on_enter() {
        let groups = [Node::new("home").with_children(["dishes", "laundry"])];
        let mut list = TodoList::try_new(groups, NavigatorConfig::new()).expect("config");
        assert_eq!(list.navigator().visible_entries().len(), 1);
        list.handle_key(&KeyEvent::new(KeyCode::Enter));
        assert_eq!(list.navigator().visible_entries().len(), 3);
        assert_eq!(list.progress(), (0, 2));
    }

    #[test]
    fn progress_counts_leaves_only() {
        let groups = [
            Node::new("home")
                .with_expanded(true)
                .with_children(["dishes", "laundry"]),
            Node::from("taxes"),
        ];
        let mut list = TodoList::try_new(groups, NavigatorConfig::new()).expect("config");
        assert_eq!(list.progress(), (0, 3));

        list.handle_key(&KeyEvent::new(KeyCode::Tab));
        assert_eq!(list.done().len(), 1, "the group row itself is marked");
        assert_eq!(list.progress(), (0, 3));

        list.handle_key(&KeyEvent::new(KeyCode::Down));
        list.handle_key(&KeyEvent::new(KeyCode::Enter));
        list.handle_key(&KeyEvent::new(KeyCode::End));
        list.handle_key(&KeyEvent::char(' '));
        assert_eq!(list.progress(), (2, 3));
    }

    #[test]
    fn set_items_clears_done() {
        let mut list = TodoList::try_new(chores(), NavigatorConfig::new()).expect("config");
        list.handle_key(&KeyEvent::new(KeyCode::Enter));
        list.set_items(["write tests"]);
        assert_eq!(list.progress(), (0, 1));
    }
}
