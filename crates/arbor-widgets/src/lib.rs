#![forbid(unsafe_code)]

//! Arbor Widgets
//!
//! A hierarchical list navigation engine and the three widgets built on it.
//!
//! # Key Components
//!
//! - [`Node`] - immutable tree node with label, children, icon, badge, payload
//! - [`flatten()`] / [`FlatEntry`] - pre-order projection with positional paths
//! - [`resolve_visible`] - collapse overrides plus filtering
//! - [`reduce`] - pure key-to-transition state machine
//! - [`ViewportCoupler`] - windowing and smooth scroll for the visible rows
//! - [`RowRenderer`] - one entry to one styled [`RowLine`]
//! - [`Navigator`] - one widget's engine instance
//! - [`Tree`], [`ItemList`], [`TodoList`] - the widgets
//!
//! # How it fits in the system
//!
//! Widgets are driven by `arbor-runtime`: [`mount()`] registers a widget's
//! input callback and its 16 ms scroll animation interval with a
//! [`arbor_runtime::Hooks`] registry, and the host calls `dispatch` and
//! `advance` from its loop. Rendering produces plain [`RowLine`]s with
//! semantic [`SpanStyle`]s that the host maps onto its terminal backend.

pub mod config;
pub mod error;
pub mod flatten;
pub mod item_list;
pub mod mount;
pub mod nav;
pub mod navigator;
pub mod node;
pub mod path;
pub mod row;
pub mod todo_list;
pub mod tree;
pub mod viewport;
pub mod virtual_list;
pub mod visibility;

pub use config::NavigatorConfig;
pub use error::ConfigError;
pub use flatten::{FlatEntry, GuideStyle, flatten};
pub use item_list::ItemList;
pub use mount::{Interactive, Mount, mount};
pub use nav::{NavAction, NavContext, NavEffect, NavState, SelectedPaths, Transition, reduce};
pub use navigator::{NavPersistState, Navigator};
pub use node::{Node, nodes};
pub use path::NodePath;
pub use row::{RowFlags, RowLine, RowRenderer, Span, SpanStyle};
pub use todo_list::TodoList;
pub use tree::Tree;
pub use viewport::{ANIMATION_TICK, ScrollEaser, ViewportCoupler, Window};
pub use virtual_list::{VirtualList, Windowing};
pub use visibility::{ExpandOverrides, FilterMatcher, resolve_visible};

#[cfg(feature = "config-file")]
pub use node::{NodeSpec, nodes_from_json, nodes_from_toml};
