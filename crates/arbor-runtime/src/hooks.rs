#![forbid(unsafe_code)]

//! Input callbacks and intervals, driven by the host loop.
//!
//! [`Hooks`] is the host side of the hook runtime. Widgets register an
//! input callback and, when they animate, an interval. The host then:
//!
//! 1. calls [`Hooks::dispatch`] for every input event, and
//! 2. calls [`Hooks::advance`] once per loop iteration with the time that
//!    passed since the previous call.
//!
//! Both run every callback synchronously on the caller's thread, one at a
//! time, in registration order. There is no background thread; a widget
//! that is unmounted simply stops being called.
//!
//! # Interval semantics
//!
//! An interval accumulates elapsed time. When the accumulated time reaches
//! its period, the callback fires once with the accumulated duration and
//! the accumulator resets. A host that stalls for several periods therefore
//! gets one catch-up call carrying the whole stall, not a burst of calls.

use std::time::Duration;

use arbor_core::event::Event;

use crate::state::State;

/// Smallest accepted interval period.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle for a registered input callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputId(u64);

/// Handle for a registered interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntervalId(u64);

type InputCallback = Box<dyn FnMut(&Event) -> bool>;
type IntervalCallback = Box<dyn FnMut(Duration)>;

struct IntervalEntry {
    id: IntervalId,
    period: Duration,
    elapsed: Duration,
    callback: IntervalCallback,
}

/// Registry of input callbacks and intervals.
#[derive(Default)]
pub struct Hooks {
    next_id: u64,
    inputs: Vec<(InputId, InputCallback)>,
    intervals: Vec<IntervalEntry>,
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("inputs", &self.inputs.len())
            .field("intervals", &self.intervals.len())
            .finish()
    }
}

impl Hooks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Create a state cell owned by the caller.
    ///
    /// The cell lives as long as the caller keeps a handle to it; the
    /// registry does not retain it.
    #[must_use]
    pub fn state<T: Clone + PartialEq + 'static>(&self, initial: T) -> State<T> {
        State::new(initial)
    }

    /// Register an input callback. It returns `true` when it handled the event.
    pub fn on_input(&mut self, callback: impl FnMut(&Event) -> bool + 'static) -> InputId {
        let id = InputId(self.next_id());
        self.inputs.push((id, Box::new(callback)));
        tracing::debug!(input_id = id.0, "registered input callback");
        id
    }

    /// Remove an input callback. Returns `false` if it was not registered.
    pub fn remove_input(&mut self, id: InputId) -> bool {
        let before = self.inputs.len();
        self.inputs.retain(|(entry, _)| *entry != id);
        let removed = self.inputs.len() != before;
        if removed {
            tracing::debug!(input_id = id.0, "removed input callback");
        }
        removed
    }

    /// Register a periodic callback. Periods below [`MIN_INTERVAL`] are raised to it.
    ///
    /// The callback receives the time accumulated since it last fired.
    pub fn interval(
        &mut self,
        period: Duration,
        callback: impl FnMut(Duration) + 'static,
    ) -> IntervalId {
        let id = IntervalId(self.next_id());
        let period = period.max(MIN_INTERVAL);
        self.intervals.push(IntervalEntry {
            id,
            period,
            elapsed: Duration::ZERO,
            callback: Box::new(callback),
        });
        tracing::debug!(
            interval_id = id.0,
            period_ms = period.as_millis() as u64,
            "starting interval"
        );
        id
    }

    /// Cancel an interval. Returns `false` if it was not registered.
    pub fn cancel_interval(&mut self, id: IntervalId) -> bool {
        let before = self.intervals.len();
        self.intervals.retain(|entry| entry.id != id);
        let removed = self.intervals.len() != before;
        if removed {
            tracing::debug!(interval_id = id.0, "cancelled interval");
        }
        removed
    }

    /// Deliver an event to every input callback in registration order.
    ///
    /// Returns `true` if any callback handled it.
    pub fn dispatch(&mut self, event: &Event) -> bool {
        let mut handled = false;
        for (_, callback) in &mut self.inputs {
            handled |= callback(event);
        }
        handled
    }

    /// Advance time by `dt`, firing every interval that came due.
    ///
    /// Returns the number of callbacks fired.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let mut fired = 0;
        for entry in &mut self.intervals {
            entry.elapsed = entry.elapsed.saturating_add(dt);
            if entry.elapsed >= entry.period {
                let elapsed = std::mem::take(&mut entry.elapsed);
                (entry.callback)(elapsed);
                fired += 1;
            }
        }
        fired
    }

    /// Number of registered input callbacks.
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of registered intervals.
    #[must_use]
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }
}
