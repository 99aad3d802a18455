#![forbid(unsafe_code)]

//! Arbor Runtime
//!
//! The hook runtime that mounted widgets live in. It is deliberately small
//! and single-threaded: every callback runs synchronously on the host's
//! thread, so no locking is needed anywhere in the engine.
//!
//! # Key Components
//!
//! - [`State`] - shared value cell with functional updates and change notification
//! - [`Hooks`] - input callback and interval registry driven by the host loop
//! - [`WidgetCache`] - caller-owned keyed cache with explicit eviction
//!
//! # How it fits in the system
//! The host translates terminal input into [`arbor_core::event::Event`] and
//! calls [`Hooks::dispatch`]; on each loop iteration it calls
//! [`Hooks::advance`] with the elapsed time so intervals (scroll animation
//! ticks) fire. Widgets in `arbor-widgets` register themselves here when
//! mounted and cancel their registrations when unmounted.

pub mod cache;
pub mod hooks;
pub mod state;

pub use cache::WidgetCache;
pub use hooks::{Hooks, InputId, IntervalId};
pub use state::{State, StateSubscription};
