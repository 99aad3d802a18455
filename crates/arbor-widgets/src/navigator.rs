#![forbid(unsafe_code)]

//! The engine instance behind one mounted tree, list, or todo widget.
//!
//! # Design
//!
//! A [`Navigator`] owns the node list, its cached flatten output, a
//! [`State<NavState>`] cell, a [`ViewportCoupler`], and a [`RowRenderer`].
//! Each render runs the one-way pipeline
//!
//! ```text
//! nodes -> flatten (cached) -> resolve_visible -> coupler window -> rows
//! ```
//!
//! and each key press resolves a [`Key`], runs [`reduce`] through the state
//! cell's functional updater, fires the matching callback, and tells the
//! coupler when the selection moved.
//!
//! # Invariants
//!
//! 1. The flatten cache always matches `nodes`; it is rebuilt only by
//!    [`Navigator::set_nodes`].
//! 2. Replacing the nodes resets every piece of derived state.
//! 3. The stored selection index is within the visible sequence after every
//!    handled key.
//!
//! # Failure Modes
//!
//! - Callbacks run synchronously inside [`Navigator::handle_key`]. A
//!   callback that panics unwinds through the host.
//! - A callback that re-borrows the `RefCell` holding this navigator (when
//!   mounted through [`crate::mount`]) panics on the double borrow.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use arbor_core::event::KeyEvent;
use arbor_core::keybinding::Key;
use arbor_runtime::State;
use web_time::Instant;

use crate::config::NavigatorConfig;
use crate::error::ConfigError;
use crate::flatten::{FlatEntry, flatten};
use crate::mount::Interactive;
use crate::nav::{NavAction, NavContext, NavEffect, NavState, reduce};
use crate::node::Node;
use crate::path::NodePath;
use crate::row::{RowFlags, RowLine, RowRenderer, Span};
use crate::viewport::{ViewportCoupler, Window};
use crate::visibility::{ExpandOverrides, is_expanded};

type SelectCallback = Box<dyn FnMut(&Node)>;
type ToggleCallback = Box<dyn FnMut(&Node, bool)>;
type MultiSelectCallback = Box<dyn FnMut(&[Node])>;

/// Saved navigation state, keyed by path.
///
/// Paths are positional; restoring into a reordered node list attaches the
/// state to whatever now lives at each position. Paths that no longer exist
/// are dropped on restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct NavPersistState {
    /// Branches explicitly expanded.
    pub expanded: BTreeSet<NodePath>,
    /// Branches explicitly collapsed.
    pub collapsed: BTreeSet<NodePath>,
    /// Marked entries.
    pub selected: BTreeSet<NodePath>,
    /// Filter text.
    pub filter: String,
    /// Cursor position in the visible sequence.
    pub cursor: usize,
}

#[cfg(feature = "config-file")]
impl NavPersistState {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// One widget's navigation engine.
pub struct Navigator {
    nodes: Vec<Node>,
    flat: Vec<FlatEntry>,
    config: NavigatorConfig,
    state: State<NavState>,
    coupler: ViewportCoupler,
    renderer: RowRenderer,
    enter_marks_leaf: bool,
    on_select: Option<SelectCallback>,
    on_toggle: Option<ToggleCallback>,
    on_multi_select: Option<MultiSelectCallback>,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("nodes", &self.nodes.len())
            .field("flat", &self.flat.len())
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// Validate `config` and build a navigator over `nodes`.
    pub fn try_new<I, N>(nodes: I, config: NavigatorConfig) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        config.validate()?;
        let nodes: Vec<Node> = nodes.into_iter().map(Into::into).collect();
        let flat = flatten(&nodes);
        let state = State::new(NavState::seeded(
            &flat,
            config.expand_all,
            config.collapse_all,
        ));
        let coupler = coupler_for(&config);
        let renderer = RowRenderer::new()
            .with_multi_select(config.multi_select)
            .with_guides(config.show_guides)
            .with_guide_style(config.guide_style)
            .with_indent_size(config.indent_size)
            .with_default_icons(config.show_default_icons);
        tracing::debug!(
            message = "arbor.navigator.new",
            nodes = nodes.len(),
            flat = flat.len(),
            searchable = config.searchable,
            multi_select = config.multi_select,
        );
        Ok(Self {
            nodes,
            flat,
            config,
            state,
            coupler,
            renderer,
            enter_marks_leaf: false,
            on_select: None,
            on_toggle: None,
            on_multi_select: None,
        })
    }

    /// Called with the node when Enter activates a leaf.
    #[must_use]
    pub fn on_select(mut self, f: impl FnMut(&Node) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    /// Called with the branch and its new state when it expands or collapses.
    #[must_use]
    pub fn on_toggle(mut self, f: impl FnMut(&Node, bool) + 'static) -> Self {
        self.on_toggle = Some(Box::new(f));
        self
    }

    /// Called with every marked node, in flatten order, when marks change.
    #[must_use]
    pub fn on_multi_select(mut self, f: impl FnMut(&[Node]) + 'static) -> Self {
        self.on_multi_select = Some(Box::new(f));
        self
    }

    /// Delegate label rendering.
    #[must_use]
    pub fn with_label_fn(
        mut self,
        f: impl Fn(&Node, RowFlags) -> Vec<Span> + Send + Sync + 'static,
    ) -> Self {
        self.renderer = self.renderer.with_label_fn(f);
        self
    }

    /// Hide or show the expand glyph column.
    pub(crate) fn set_expand_glyph(&mut self, on: bool) {
        self.renderer = self.renderer.clone().with_expand_glyph(on);
    }

    /// Make Enter on a leaf toggle its mark as well as select it.
    pub(crate) fn set_enter_marks_leaf(&mut self, on: bool) {
        self.enter_marks_leaf = on;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Source nodes.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Cached flatten output.
    #[must_use]
    pub fn flat(&self) -> &[FlatEntry] {
        &self.flat
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Current navigation snapshot.
    #[must_use]
    pub fn state(&self) -> NavState {
        self.state.get()
    }

    /// The state cell, for subscriptions.
    #[must_use]
    pub fn state_cell(&self) -> &State<NavState> {
        &self.state
    }

    /// The viewport coupler.
    #[must_use]
    pub fn coupler(&self) -> &ViewportCoupler {
        &self.coupler
    }

    /// Current filter text.
    #[must_use]
    pub fn filter(&self) -> String {
        self.state.with(|s| s.filter.clone())
    }

    /// Cursor position in the visible sequence.
    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.state.with(|s| s.selected_index)
    }

    fn context(&self) -> NavContext<'_> {
        NavContext {
            flat: &self.flat,
            matcher: &self.config.filter,
            searchable: self.config.searchable,
            multi_select: self.config.multi_select,
            page_size: self.config.effective_page_size(),
            enter_marks_leaf: self.enter_marks_leaf,
        }
    }

    /// Entries currently visible, in order.
    #[must_use]
    pub fn visible_entries(&self) -> Vec<FlatEntry> {
        let state = self.state.get();
        self.context()
            .visible(&state)
            .into_iter()
            .map(|i| self.flat[i].clone())
            .collect()
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn selected_entry(&self) -> Option<FlatEntry> {
        let state = self.state.get();
        let visible = self.context().visible(&state);
        let last = visible.len().checked_sub(1)?;
        Some(self.flat[visible[state.selected_index.min(last)]].clone())
    }

    /// Marked nodes in flatten order.
    #[must_use]
    pub fn marked_nodes(&self) -> Vec<Node> {
        let state = self.state.get();
        self.context().marked_nodes(&state)
    }

    /// Whether the scroll animation is still running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.coupler.is_animating()
    }

    // ------------------------------------------------------------------
    // Input and time
    // ------------------------------------------------------------------

    /// Apply one key event. Returns whether it was handled.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let key = Key::from_event(event);
        if key == Key::Unbound {
            return false;
        }

        let ctx = self.context();
        let (transition, prev_index, prev_marks) = self.state.update_with(|prev| {
            let transition = reduce(prev, key, &ctx);
            let next = transition.state.clone();
            (
                next,
                (transition, prev.selected_index, prev.selected_paths.clone()),
            )
        });
        if !transition.handled() {
            return false;
        }
        let next = &transition.state;
        let view_changed = next.selected_index != prev_index
            || matches!(
                transition.effect,
                NavEffect::FilterChanged | NavEffect::Toggled { .. }
            )
            || matches!(
                transition.action,
                NavAction::ExpandAll | NavAction::CollapseAll
            );
        let marks_changed = next.selected_paths != prev_marks;
        let visible_len = if view_changed {
            ctx.visible(next).len()
        } else {
            0
        };
        let marked = if marks_changed {
            ctx.marked_nodes(next)
        } else {
            Vec::new()
        };
        let selected_index = next.selected_index;

        if view_changed {
            use crate::virtual_list::Windowing;
            self.coupler.list_mut().set_item_count(visible_len);
            self.coupler.selection_changed(selected_index);
        }

        match transition.effect {
            NavEffect::Selected(node) => {
                if let Some(cb) = self.on_select.as_mut() {
                    cb(&node);
                }
                if marks_changed {
                    if let Some(cb) = self.on_multi_select.as_mut() {
                        cb(&marked);
                    }
                }
            }
            NavEffect::Toggled { node, expanded } => {
                if let Some(cb) = self.on_toggle.as_mut() {
                    cb(&node, expanded);
                }
            }
            NavEffect::MultiSelected(nodes) => {
                if let Some(cb) = self.on_multi_select.as_mut() {
                    cb(&nodes);
                }
            }
            NavEffect::Moved(_) | NavEffect::FilterChanged | NavEffect::None => {}
        }
        true
    }

    /// Advance the scroll animation. Returns whether a step was taken.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.coupler.tick(dt)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Render the current window.
    ///
    /// Produces the windowed rows with `↑ N more` / `↓ N more` markers, or a
    /// single placeholder row when nothing is visible.
    pub fn render(&mut self) -> Vec<RowLine> {
        let started = Instant::now();
        let state = self.state.get();
        let visible = self.context().visible(&state);
        let selected = state.selected_index.min(visible.len().saturating_sub(1));
        self.coupler.sync(visible.len(), selected);
        let window = self.coupler.window();

        let span = tracing::debug_span!(
            "arbor.render",
            total = self.flat.len(),
            visible = visible.len(),
            window_start = window.start,
            window_end = window.end,
            render_duration_us = tracing::field::Empty,
        );
        let _guard = span.enter();

        let rows = if visible.is_empty() {
            let text = if self.flat.is_empty() {
                &self.config.empty_text
            } else {
                &self.config.no_match_text
            };
            vec![RowLine::placeholder(text.as_str())]
        } else {
            self.render_window(&state, &visible, selected, window)
        };

        span.record("render_duration_us", started.elapsed().as_micros() as u64);
        rows
    }

    fn render_window(
        &self,
        state: &NavState,
        visible: &[usize],
        selected: usize,
        window: Window,
    ) -> Vec<RowLine> {
        let mut rows = Vec::with_capacity(window.len() + 2);
        if let Some(text) = window.more_above() {
            rows.push(RowLine::marker(text));
        }
        for index in window.range() {
            let entry = &self.flat[visible[index]];
            let flags = RowFlags {
                focused: index == selected,
                expanded: is_expanded(entry, &state.overrides),
                selected: state.is_marked(&entry.path),
            };
            rows.push(self.renderer.render(entry, flags));
        }
        if let Some(text) = window.more_below() {
            rows.push(RowLine::marker(text));
        }
        rows
    }

    // ------------------------------------------------------------------
    // Lifecycle and persistence
    // ------------------------------------------------------------------

    /// Replace the node list and reset all derived state.
    pub fn set_nodes<I, N>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.nodes = nodes.into_iter().map(Into::into).collect();
        self.flat = flatten(&self.nodes);
        self.state.set(NavState::seeded(
            &self.flat,
            self.config.expand_all,
            self.config.collapse_all,
        ));
        self.coupler = coupler_for(&self.config);
        tracing::debug!(
            message = "arbor.navigator.reset",
            nodes = self.nodes.len(),
            flat = self.flat.len(),
        );
    }

    /// Snapshot the state for persistence.
    #[must_use]
    pub fn save_state(&self) -> NavPersistState {
        self.state.with(|state| {
            let (expanded, collapsed) = state
                .overrides
                .iter()
                .partition::<Vec<_>, _>(|(_, expanded)| **expanded);
            NavPersistState {
                expanded: expanded.into_iter().map(|(p, _)| p.clone()).collect(),
                collapsed: collapsed.into_iter().map(|(p, _)| p.clone()).collect(),
                selected: state.selected_paths.clone(),
                filter: state.filter.clone(),
                cursor: state.selected_index,
            }
        })
    }

    /// Restore a saved snapshot. Paths missing from the current nodes are
    /// dropped and the cursor is clamped to the visible sequence.
    pub fn restore_state(&mut self, saved: NavPersistState) {
        let branches: BTreeSet<&NodePath> = self
            .flat
            .iter()
            .filter(|e| e.is_branch())
            .map(|e| &e.path)
            .collect();
        let known: BTreeSet<&NodePath> = self.flat.iter().map(|e| &e.path).collect();

        let mut overrides = ExpandOverrides::new();
        for path in saved.collapsed.into_iter().filter(|p| branches.contains(p)) {
            overrides.insert(path, false);
        }
        for path in saved.expanded.into_iter().filter(|p| branches.contains(p)) {
            overrides.insert(path, true);
        }
        let selected_paths = saved
            .selected
            .into_iter()
            .filter(|p| known.contains(p))
            .collect();

        let mut next = NavState {
            overrides,
            selected_paths,
            filter: saved.filter,
            selected_index: saved.cursor,
        };
        let len = self.context().visible(&next).len();
        next.selected_index = next.selected_index.min(len.saturating_sub(1));
        self.state.set(next);
    }
}

fn coupler_for(config: &NavigatorConfig) -> ViewportCoupler {
    ViewportCoupler::with_defaults(config.viewport_height, config.overscan, config.smooth_scroll)
}

impl Interactive for Navigator {
    fn handle_key(&mut self, event: &KeyEvent) -> bool {
        Navigator::handle_key(self, event)
    }

    fn tick(&mut self, dt: Duration) -> bool {
        Navigator::tick(self, dt)
    }
}
