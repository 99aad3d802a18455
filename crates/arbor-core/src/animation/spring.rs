#![forbid(unsafe_code)]

//! Damped spring used for scroll easing.
//!
//! The spring follows the classical damped oscillator
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!
//! integrated with semi-implicit Euler. Scroll easing wants no overshoot
//! (a list should never scroll past the row it is heading for), so the
//! default damping is critical: `2 × √stiffness`.
//!
//! # Invariants
//!
//! 1. A spring at rest stays at rest until `set_target` moves the target by
//!    more than the rest threshold, or `jump_to` is called.
//! 2. On coming to rest the position snaps exactly to the target.
//! 3. Stiffness is at least [`MIN_STIFFNESS`] and damping stays critical.
//!
//! # Failure Modes
//!
//! - Very large dt: subdivided into steps of at most 4 ms, so a stalled
//!   host that delivers one 500 ms tick still converges smoothly.

use std::time::Duration;

use super::Animation;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta below which the spring may come to rest.
const DEFAULT_REST_THRESHOLD: f64 = 0.01;

/// Velocity below which the spring may come to rest.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.05;

/// Minimum stiffness to prevent degenerate springs.
pub const MIN_STIFFNESS: f64 = 0.1;

/// Default stiffness for scroll motion.
pub const DEFAULT_STIFFNESS: f64 = 220.0;

/// A damped harmonic oscillator on one axis.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Default for Spring {
    fn default() -> Self {
        Self::at(0.0)
    }
}

impl Spring {
    /// Create a critically damped spring resting at `position`.
    #[must_use]
    pub fn at(position: f64) -> Self {
        Self {
            position,
            velocity: 0.0,
            target: position,
            stiffness: DEFAULT_STIFFNESS,
            damping: 2.0 * DEFAULT_STIFFNESS.sqrt(),
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: true,
        }
    }

    /// Set stiffness, keeping the spring critically damped.
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self.damping = self.critical_damping();
        self
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Whether the spring has settled at the target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Critical damping coefficient for the current stiffness.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * self.stiffness.sqrt()
    }

    /// Change the target. Wakes the spring if the move is significant.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > self.rest_threshold
            || (self.position - target).abs() > self.rest_threshold
        {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Teleport to `position` and rest there.
    pub fn jump_to(&mut self, position: f64) {
        self.position = position;
        self.target = position;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        if (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    fn simulate(spring: &mut Spring, frames: usize) {
        for _ in 0..frames {
            spring.tick(MS_16);
        }
    }

    #[test]
    fn new_spring_is_at_rest() {
        let spring = Spring::at(5.0);
        assert!(spring.is_at_rest());
        assert!((spring.position() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn spring_reaches_target() {
        let mut spring = Spring::at(0.0);
        spring.set_target(40.0);
        assert!(!spring.is_at_rest());

        simulate(&mut spring, 200);

        assert!(spring.is_complete(), "position: {}", spring.position());
        assert!((spring.position() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn critical_default_does_not_overshoot() {
        let mut spring = Spring::at(0.0);
        spring.set_target(10.0);
        let mut max_pos = 0.0_f64;
        for _ in 0..300 {
            spring.tick(MS_16);
            max_pos = max_pos.max(spring.position());
        }
        assert!(max_pos <= 10.0 + 1e-6, "overshoot to {max_pos}");
    }

    #[test]
    fn tiny_target_change_does_not_wake() {
        let mut spring = Spring::at(3.0);
        spring.set_target(3.001);
        assert!(spring.is_at_rest());
    }

    #[test]
    fn large_dt_is_subdivided() {
        let mut spring = Spring::at(0.0);
        spring.set_target(100.0);
        spring.tick(Duration::from_secs(5));
        assert!(spring.position().is_finite());
        assert!(spring.is_at_rest());
    }

    #[test]
    fn jump_to_rests_immediately() {
        let mut spring = Spring::at(0.0);
        spring.set_target(50.0);
        spring.tick(MS_16);
        spring.jump_to(7.0);
        assert!(spring.is_at_rest());
        assert!((spring.position() - 7.0).abs() < f64::EPSILON);
        assert!((spring.velocity()).abs() < f64::EPSILON);
    }

    #[test]
    fn stiffness_is_clamped() {
        let spring = Spring::at(0.0).with_stiffness(-3.0);
        assert!((spring.critical_damping() - 2.0 * MIN_STIFFNESS.sqrt()).abs() < 1e-9);
    }
}
