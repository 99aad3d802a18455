#![forbid(unsafe_code)]

//! Mounting widgets into the hook runtime.
//!
//! A mounted widget receives every dispatched key event through an input
//! callback and advances its scroll animation from a [`ANIMATION_TICK`]
//! interval. [`Mount::unmount`] cancels both registrations.
//!
//! The runtime holds only weak references. Dropping the last strong handle
//! to a widget turns its callbacks into no-ops until it is unmounted.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use arbor_core::event::{Event, KeyEvent};
use arbor_runtime::{Hooks, InputId, IntervalId};

use crate::viewport::ANIMATION_TICK;

/// A widget that reacts to keys and animation ticks.
pub trait Interactive {
    /// Apply one key event. Returns whether it was handled.
    fn handle_key(&mut self, event: &KeyEvent) -> bool;

    /// Advance animations by `dt`. Returns whether anything moved.
    fn tick(&mut self, dt: Duration) -> bool;
}

/// Registrations of one mounted widget.
#[derive(Debug)]
#[must_use = "dropping a Mount without unmounting leaves its callbacks registered"]
pub struct Mount {
    input: InputId,
    interval: IntervalId,
}

impl Mount {
    /// Cancel the input callback and the animation interval.
    ///
    /// Returns `false` if either registration was already gone.
    pub fn unmount(self, hooks: &mut Hooks) -> bool {
        let input = hooks.remove_input(self.input);
        let interval = hooks.cancel_interval(self.interval);
        tracing::debug!(message = "arbor.unmount", input, interval);
        input && interval
    }

    /// Id of the input callback.
    #[must_use]
    pub fn input_id(&self) -> InputId {
        self.input
    }

    /// Id of the animation interval.
    #[must_use]
    pub fn interval_id(&self) -> IntervalId {
        self.interval
    }
}

/// Register `widget` with `hooks`.
pub fn mount<W>(widget: &Rc<RefCell<W>>, hooks: &mut Hooks) -> Mount
where
    W: Interactive + 'static,
{
    let for_input: Weak<RefCell<W>> = Rc::downgrade(widget);
    let input = hooks.on_input(move |event: &Event| {
        let Some(key) = event.as_key() else {
            return false;
        };
        for_input
            .upgrade()
            .is_some_and(|widget| widget.borrow_mut().handle_key(key))
    });

    let for_tick: Weak<RefCell<W>> = Rc::downgrade(widget);
    let interval = hooks.interval(ANIMATION_TICK, move |dt| {
        if let Some(widget) = for_tick.upgrade() {
            widget.borrow_mut().tick(dt);
        }
    });

    tracing::debug!(message = "arbor.mount");
    Mount { input, interval }
}
