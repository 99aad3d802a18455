#![forbid(unsafe_code)]

//! Time-driven easing primitives.
//!
//! Everything here advances only when the host calls `tick`/`update`
//! with an elapsed duration; nothing reads a clock.

pub mod scroller;
pub mod spring;

pub use scroller::SmoothScroller;
pub use spring::Spring;

use std::time::Duration;

/// A value that moves toward a goal as time is fed to it.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has settled.
    fn is_complete(&self) -> bool;
}
