#![forbid(unsafe_code)]

//! Two-axis smooth scroller.
//!
//! A [`SmoothScroller`] eases a scroll position toward a target offset with
//! one critically damped [`Spring`] per axis. The viewport coupler sets the
//! target whenever the selection moves and a periodic tick calls
//! [`SmoothScroller::update`] while [`SmoothScroller::is_animating`] holds.

use std::time::Duration;

use super::spring::Spring;

/// Eases an `(x, y)` scroll offset toward a target.
#[derive(Debug, Clone, Default)]
pub struct SmoothScroller {
    x: Spring,
    y: Spring,
}

impl SmoothScroller {
    /// Create a scroller resting at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom stiffness on both axes.
    #[must_use]
    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.x = self.x.with_stiffness(stiffness);
        self.y = self.y.with_stiffness(stiffness);
        self
    }

    /// Set the offset to ease toward.
    pub fn set_target(&mut self, x: f64, y: f64) {
        self.x.set_target(x);
        self.y.set_target(y);
        #[cfg(feature = "tracing")]
        tracing::trace!(message = "scroller.target", x, y);
    }

    /// Advance by `delta_seconds`. Negative or NaN deltas are ignored.
    pub fn update(&mut self, delta_seconds: f64) {
        if !(delta_seconds > 0.0) {
            return;
        }
        let dt = Duration::from_secs_f64(delta_seconds);
        self.x.advance(dt);
        self.y.advance(dt);
    }

    /// Whether either axis is still moving.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.x.is_at_rest() || !self.y.is_at_rest()
    }

    /// Current eased offset.
    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        (self.x.position(), self.y.position())
    }

    /// Current target offset.
    #[must_use]
    pub fn target(&self) -> (f64, f64) {
        (self.x.target(), self.y.target())
    }

    /// Skip the animation and rest at `(x, y)`.
    pub fn jump_to(&mut self, x: f64, y: f64) {
        self.x.jump_to(x);
        self.y.jump_to(y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_at_origin() {
        let scroller = SmoothScroller::new();
        assert!(!scroller.is_animating());
        assert_eq!(scroller.position(), (0.0, 0.0));
    }

    #[test]
    fn animates_until_target_reached() {
        let mut scroller = SmoothScroller::new();
        scroller.set_target(0.0, 12.0);
        assert!(scroller.is_animating());

        let mut frames = 0;
        while scroller.is_animating() && frames < 1000 {
            scroller.update(0.016);
            frames += 1;
        }

        assert!(!scroller.is_animating());
        assert_eq!(scroller.position(), (0.0, 12.0));
        assert!(frames > 1, "easing should take more than one frame");
    }

    #[test]
    fn position_moves_monotonically_toward_target() {
        let mut scroller = SmoothScroller::new();
        scroller.set_target(0.0, 30.0);
        let mut last = 0.0;
        for _ in 0..60 {
            scroller.update(0.016);
            let (_, y) = scroller.position();
            assert!(y >= last, "scroll went backwards: {y} < {last}");
            last = y;
        }
    }

    #[test]
    fn stiffer_scroller_settles_sooner() {
        fn frames_to_settle(mut scroller: SmoothScroller) -> usize {
            scroller.set_target(0.0, 20.0);
            let mut frames = 0;
            while scroller.is_animating() && frames < 2000 {
                scroller.update(0.016);
                frames += 1;
            }
            frames
        }
        let soft = frames_to_settle(SmoothScroller::new().with_stiffness(40.0));
        let stiff = frames_to_settle(SmoothScroller::new().with_stiffness(900.0));
        assert!(stiff < soft, "stiff {stiff} vs soft {soft}");
    }

    #[test]
    fn non_positive_delta_is_ignored() {
        let mut scroller = SmoothScroller::new();
        scroller.set_target(0.0, 5.0);
        scroller.update(0.0);
        scroller.update(-1.0);
        scroller.update(f64::NAN);
        assert_eq!(scroller.position(), (0.0, 0.0));
    }

    #[test]
    fn jump_to_stops_animation() {
        let mut scroller = SmoothScroller::new();
        scroller.set_target(0.0, 9.0);
        scroller.jump_to(0.0, 9.0);
        assert!(!scroller.is_animating());
        assert_eq!(scroller.target(), (0.0, 9.0));
    }
}
