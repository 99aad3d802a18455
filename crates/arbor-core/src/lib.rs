#![forbid(unsafe_code)]

//! Core: input events, key resolution, and scroll easing.
//!
//! # Role in Arbor
//! `arbor-core` is the input layer. It owns the canonical key event types
//! that hosts translate their terminal input into, the closed [`keybinding::Key`]
//! enum the navigation state machine dispatches on, and the spring-based
//! [`animation::SmoothScroller`] used by the viewport coupler.
//!
//! # How it fits in the system
//! The runtime (`arbor-runtime`) routes [`event::Event`] values to mounted
//! widgets; the widgets (`arbor-widgets`) resolve them to [`keybinding::Key`]
//! and feed the result to a pure reducer. Nothing here touches the terminal.

pub mod animation;
pub mod event;
pub mod keybinding;
