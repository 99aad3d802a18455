#![forbid(unsafe_code)]

//! Arbor public facade crate.
//!
//! Re-exports the widget, runtime, and input types an application needs,
//! plus a prelude for day-to-day use.
//!
//! ```
//! use arbor::prelude::*;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let nodes = vec![Node::new("docs").child("intro.md"), Node::from("README.md")];
//! let tree = Rc::new(RefCell::new(
//!     Tree::try_new(nodes, NavigatorConfig::new().viewport_height(5)).unwrap(),
//! ));
//!
//! let mut hooks = Hooks::new();
//! let mounted = mount(&tree, &mut hooks);
//! assert!(hooks.dispatch(&Event::Key(KeyEvent::new(KeyCode::Enter))));
//! assert_eq!(tree.borrow_mut().render().len(), 3);
//! mounted.unmount(&mut hooks);
//! ```

// --- Core re-exports -------------------------------------------------------

pub use arbor_core::animation::SmoothScroller;
pub use arbor_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use arbor_core::keybinding::Key;

// --- Runtime re-exports ----------------------------------------------------

pub use arbor_runtime::{Hooks, InputId, IntervalId, State, StateSubscription, WidgetCache};

// --- Widget re-exports -----------------------------------------------------

pub use arbor_widgets::{
    ConfigError, FlatEntry, GuideStyle, Interactive, ItemList, Mount, NavPersistState,
    NavState, Navigator, NavigatorConfig, Node, NodePath, RowLine, Span, SpanStyle, TodoList,
    Tree, mount,
};

/// Standard result type for fallible widget construction.
pub type Result<T> = std::result::Result<T, ConfigError>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ConfigError, Event, Hooks, Interactive, ItemList, KeyCode, KeyEvent, Modifiers, Mount,
        NavigatorConfig, Node, Result, RowLine, SpanStyle, State, TodoList, Tree, WidgetCache,
        mount,
    };

    pub use crate::{core, runtime, widgets};
}

pub use arbor_core as core;
pub use arbor_runtime as runtime;
pub use arbor_widgets as widgets;
