#![forbid(unsafe_code)]

//! Pure input state machine.
//!
//! [`reduce`] maps one resolved [`Key`] and the previous [`NavState`] to a
//! [`Transition`]: the next complete state plus the effect the host should
//! observe. It never mutates its input, so it can be handed straight to a
//! state cell's functional updater.
//!
//! # Dispatch order
//!
//! A key triggers at most one category, tried in this order:
//!
//! 1. **Filter capture** (searchable only). Printable characters append to
//!    the filter, Backspace pops a character (still handled on an empty
//!    filter), Escape clears a non-empty filter. Each resets the selection
//!    to 0. An empty filter lets Escape fall through to the host.
//!
//!    Space is the one printable exception: when both search and
//!    multi-select are on, Space toggles the mark instead of being typed
//!    into the filter. Filters therefore cannot contain spaces in that mode.
//! 2. **Linear navigation.** Up/`k`, Down/`j`, `g`/Home, `G`/End,
//!    PageUp/`u`, PageDown/`d`.
//! 3. **Mark toggle** (multi-select only). Tab or Space.
//! 4. **Expand, collapse, activate.** Enter toggles a branch or selects a
//!    leaf; Right/`l` expands and Left/`h` collapses branches only.
//! 5. **Bulk.** `*` expands every branch; `-` collapses every branch and
//!    moves the selection to 0.
//!
//! # Invariants
//!
//! - After every transition `selected_index < len(visible)` when the visible
//!   sequence is non-empty, and `selected_index == 0` otherwise.
//! - Down at the last row and Up at row 0 leave the state unchanged.
//! - Toggling the same mark twice restores the mark set.
//!
//! # Failure Modes
//!
//! None. Unbound keys return the previous state with
//! [`NavAction::Ignored`], which hosts read as "not handled".

use std::collections::BTreeSet;

use arbor_core::keybinding::Key;

use crate::flatten::FlatEntry;
use crate::node::Node;
use crate::path::NodePath;
use crate::visibility::{ExpandOverrides, FilterMatcher, is_expanded, resolve_visible_indices};

/// Ordered set of marked paths (multi-select picks, todo "done" set).
pub type SelectedPaths = BTreeSet<NodePath>;

/// Complete navigation snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    /// Sparse expand/collapse overrides.
    pub overrides: ExpandOverrides,
    /// Marked paths.
    pub selected_paths: SelectedPaths,
    /// Current filter text; empty disables filtering.
    pub filter: String,
    /// Offset into the visible sequence.
    pub selected_index: usize,
}

impl NavState {
    /// Initial state, with overrides pre-seeded for expand-all or collapse-all.
    #[must_use]
    pub fn seeded(flat: &[FlatEntry], expand_all: bool, collapse_all: bool) -> Self {
        let mut state = Self::default();
        if expand_all || collapse_all {
            state.overrides = all_branches(flat, expand_all);
        }
        state
    }

    /// Whether `path` is marked.
    #[must_use]
    pub fn is_marked(&self, path: &NodePath) -> bool {
        self.selected_paths.contains(path)
    }
}

fn all_branches(flat: &[FlatEntry], expanded: bool) -> ExpandOverrides {
    flat.iter()
        .filter(|entry| entry.is_branch())
        .map(|entry| (entry.path.clone(), expanded))
        .collect()
}

/// Read-only inputs to [`reduce`].
#[derive(Debug, Clone, Copy)]
pub struct NavContext<'a> {
    /// Full flatten output.
    pub flat: &'a [FlatEntry],
    /// Filter matcher.
    pub matcher: &'a FilterMatcher,
    /// Whether printable keys edit the filter.
    pub searchable: bool,
    /// Whether Tab/Space toggle marks.
    pub multi_select: bool,
    /// Rows moved by PageUp/PageDown.
    pub page_size: usize,
    /// Whether Enter on a leaf also toggles its mark.
    pub enter_marks_leaf: bool,
}

impl<'a> NavContext<'a> {
    /// Context with the default matcher, no search, no multi-select.
    #[must_use]
    pub fn new(flat: &'a [FlatEntry], matcher: &'a FilterMatcher, page_size: usize) -> Self {
        Self {
            flat,
            matcher,
            searchable: false,
            multi_select: false,
            page_size,
            enter_marks_leaf: false,
        }
    }

    /// Indices into `flat` of the entries visible under `state`.
    #[must_use]
    pub fn visible(&self, state: &NavState) -> Vec<usize> {
        resolve_visible_indices(self.flat, &state.overrides, &state.filter, self.matcher)
    }

    /// Marked nodes in flatten order.
    #[must_use]
    pub fn marked_nodes(&self, state: &NavState) -> Vec<Node> {
        self.flat
            .iter()
            .filter(|entry| state.selected_paths.contains(&entry.path))
            .map(|entry| entry.node.clone())
            .collect()
    }
}

/// Which transition a key produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// Character appended to the filter.
    FilterAppend,
    /// Last filter character removed.
    FilterPop,
    /// Filter cleared.
    FilterClear,
    /// Selection moved up one row.
    Up,
    /// Selection moved down one row.
    Down,
    /// Selection jumped to the first row.
    First,
    /// Selection jumped to the last row.
    Last,
    /// Selection moved up a page.
    PageUp,
    /// Selection moved down a page.
    PageDown,
    /// Mark toggled on the current row.
    ToggleMark,
    /// Enter on a branch.
    ToggleExpand,
    /// Enter on a leaf.
    Activate,
    /// Right/`l`.
    Expand,
    /// Left/`h`.
    Collapse,
    /// `*`.
    ExpandAll,
    /// `-`.
    CollapseAll,
    /// Key not bound in this context.
    Ignored,
}

impl NavAction {
    /// Stable name for log fields.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FilterAppend => "filter_append",
            Self::FilterPop => "filter_pop",
            Self::FilterClear => "filter_clear",
            Self::Up => "up",
            Self::Down => "down",
            Self::First => "first",
            Self::Last => "last",
            Self::PageUp => "page_up",
            Self::PageDown => "page_down",
            Self::ToggleMark => "toggle_mark",
            Self::ToggleExpand => "toggle_expand",
            Self::Activate => "activate",
            Self::Expand => "expand",
            Self::Collapse => "collapse",
            Self::ExpandAll => "expand_all",
            Self::CollapseAll => "collapse_all",
            Self::Ignored => "ignored",
        }
    }
}

/// What the host should observe after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum NavEffect {
    /// Nothing observable.
    None,
    /// The selection moved to this visible index.
    Moved(usize),
    /// The filter text changed.
    FilterChanged,
    /// A leaf was activated.
    Selected(Node),
    /// A branch was expanded or collapsed.
    Toggled {
        /// The branch.
        node: Node,
        /// New expanded state.
        expanded: bool,
    },
    /// The mark set changed; all marked nodes in flatten order.
    MultiSelected(Vec<Node>),
}

/// Result of [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Next state.
    pub state: NavState,
    /// Observable effect.
    pub effect: NavEffect,
    /// Which transition fired.
    pub action: NavAction,
}

impl Transition {
    /// Whether the key was bound.
    #[must_use]
    pub fn handled(&self) -> bool {
        self.action != NavAction::Ignored
    }

    fn ignored(state: &NavState) -> Self {
        Self {
            state: state.clone(),
            effect: NavEffect::None,
            action: NavAction::Ignored,
        }
    }
}

/// Apply one key to `state`.
#[must_use]
pub fn reduce(state: &NavState, key: Key, ctx: &NavContext<'_>) -> Transition {
    let visible = ctx.visible(state);
    let transition = dispatch(state, key, ctx, &visible);
    let transition = reclamp(state, transition, ctx, visible.len());

    if transition.handled() {
        tracing::debug!(
            message = "arbor.nav.transition",
            key = %key.name(),
            action = transition.action.name(),
            selected = transition.state.selected_index,
            visible_len = visible.len(),
        );
    }
    transition
}

fn dispatch(state: &NavState, key: Key, ctx: &NavContext<'_>, visible: &[usize]) -> Transition {
    if ctx.searchable {
        if let Some(transition) = filter_capture(state, key, ctx) {
            return transition;
        }
    }
    if let Some(transition) = linear_navigation(state, key, ctx, visible.len()) {
        return transition;
    }

    let current = current_entry(state, ctx, visible);

    if ctx.multi_select && matches!(key, Key::Tab | Key::Char(' ')) {
        let Some(entry) = current else {
            return with_action(state.clone(), NavEffect::None, NavAction::ToggleMark);
        };
        let next = toggle_mark(state, &entry.path);
        let effect = NavEffect::MultiSelected(ctx.marked_nodes(&next));
        return with_action(next, effect, NavAction::ToggleMark);
    }

    match key {
        Key::Enter => activate(state, ctx, current),
        Key::Right | Key::Char('l') => set_expanded(state, current, true, NavAction::Expand),
        Key::Left | Key::Char('h') => set_expanded(state, current, false, NavAction::Collapse),
        Key::Char('*') => {
            let mut next = state.clone();
            next.overrides.extend(all_branches(ctx.flat, true));
            with_action(next, NavEffect::None, NavAction::ExpandAll)
        }
        Key::Char('-') => {
            let mut next = state.clone();
            next.overrides.extend(all_branches(ctx.flat, false));
            next.selected_index = 0;
            with_action(next, NavEffect::Moved(0), NavAction::CollapseAll)
        }
        _ => Transition::ignored(state),
    }
}

fn with_action(state: NavState, effect: NavEffect, action: NavAction) -> Transition {
    Transition {
        state,
        effect,
        action,
    }
}

fn current_entry<'a>(
    state: &NavState,
    ctx: &NavContext<'a>,
    visible: &[usize],
) -> Option<&'a FlatEntry> {
    let last = visible.len().checked_sub(1)?;
    let flat_index = visible[state.selected_index.min(last)];
    ctx.flat.get(flat_index)
}

fn filter_capture(state: &NavState, key: Key, ctx: &NavContext<'_>) -> Option<Transition> {
    let (filter, action) = match key {
        Key::Char(' ') if ctx.multi_select => return None,
        Key::Char(c) => {
            let mut filter = state.filter.clone();
            filter.push(c);
            (filter, NavAction::FilterAppend)
        }
        Key::Backspace if state.filter.is_empty() => {
            if state.selected_index == 0 {
                return Some(with_action(state.clone(), NavEffect::None, NavAction::FilterPop));
            }
            let next = NavState {
                selected_index: 0,
                ..state.clone()
            };
            return Some(with_action(next, NavEffect::Moved(0), NavAction::FilterPop));
        }
        Key::Backspace => {
            let mut filter = state.filter.clone();
            filter.pop();
            (filter, NavAction::FilterPop)
        }
        Key::Escape if !state.filter.is_empty() => (String::new(), NavAction::FilterClear),
        _ => return None,
    };
    let next = NavState {
        filter,
        selected_index: 0,
        ..state.clone()
    };
    Some(with_action(next, NavEffect::FilterChanged, action))
}

fn linear_navigation(
    state: &NavState,
    key: Key,
    ctx: &NavContext<'_>,
    len: usize,
) -> Option<Transition> {
    let last = len.saturating_sub(1);
    let current = state.selected_index.min(last);
    let page = ctx.page_size.max(1);
    let (target, action) = match key {
        Key::Up | Key::Char('k') => (current.saturating_sub(1), NavAction::Up),
        Key::Down | Key::Char('j') => ((current + 1).min(last), NavAction::Down),
        Key::Home | Key::Char('g') => (0, NavAction::First),
        Key::End | Key::Char('G') => (last, NavAction::Last),
        Key::PageUp | Key::Char('u') => (current.saturating_sub(page), NavAction::PageUp),
        Key::PageDown | Key::Char('d') => (current.saturating_add(page).min(last), NavAction::PageDown),
        _ => return None,
    };
    if target == state.selected_index {
        return Some(with_action(state.clone(), NavEffect::None, action));
    }
    let next = NavState {
        selected_index: target,
        ..state.clone()
    };
    Some(with_action(next, NavEffect::Moved(target), action))
}

fn toggle_mark(state: &NavState, path: &NodePath) -> NavState {
    let mut next = state.clone();
    if !next.selected_paths.remove(path) {
        next.selected_paths.insert(path.clone());
    }
    next
}

fn activate(state: &NavState, ctx: &NavContext<'_>, current: Option<&FlatEntry>) -> Transition {
    let Some(entry) = current else {
        return with_action(state.clone(), NavEffect::None, NavAction::Activate);
    };
    if entry.is_branch() {
        let expanded = !is_expanded(entry, &state.overrides);
        let mut next = state.clone();
        next.overrides.insert(entry.path.clone(), expanded);
        log_toggle(&entry.path, expanded);
        return with_action(
            next,
            NavEffect::Toggled {
                node: entry.node.clone(),
                expanded,
            },
            NavAction::ToggleExpand,
        );
    }
    let next = if ctx.enter_marks_leaf {
        toggle_mark(state, &entry.path)
    } else {
        state.clone()
    };
    with_action(next, NavEffect::Selected(entry.node.clone()), NavAction::Activate)
}

fn set_expanded(
    state: &NavState,
    current: Option<&FlatEntry>,
    expanded: bool,
    action: NavAction,
) -> Transition {
    let Some(entry) = current.filter(|entry| entry.is_branch()) else {
        return with_action(state.clone(), NavEffect::None, action);
    };
    if is_expanded(entry, &state.overrides) == expanded {
        return with_action(state.clone(), NavEffect::None, action);
    }
    let mut next = state.clone();
    next.overrides.insert(entry.path.clone(), expanded);
    log_toggle(&entry.path, expanded);
    with_action(
        next,
        NavEffect::Toggled {
            node: entry.node.clone(),
            expanded,
        },
        action,
    )
}

fn log_toggle(path: &NodePath, expanded: bool) {
    tracing::debug!(message = "arbor.nav.toggle", path = %path, expanded);
}

/// Enforce the selection bound against the visible sequence of the new state.
fn reclamp(
    prev: &NavState,
    mut transition: Transition,
    ctx: &NavContext<'_>,
    prev_len: usize,
) -> Transition {
    if !transition.handled() {
        return transition;
    }
    let next = &transition.state;
    let len = if next.overrides == prev.overrides && next.filter == prev.filter {
        prev_len
    } else {
        ctx.visible(next).len()
    };
    let bound = len.saturating_sub(1);
    if transition.state.selected_index > bound {
        transition.state.selected_index = bound;
        if transition.effect == NavEffect::None {
            transition.effect = NavEffect::Moved(bound);
        }
    }
    transition
}
