#![forbid(unsafe_code)]

//! State cells with functional updates and change notification.
//!
//! # Design
//!
//! [`State<T>`] wraps a value in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). Writers never mutate the stored value in place:
//! [`State::update`] hands the previous snapshot to a pure function and
//! stores the snapshot it returns, so a reader can never observe a
//! half-applied transition. When the value changes (by `PartialEq`), all
//! live subscribers are notified in registration order.
//!
//! # Failure Modes
//!
//! - **Re-entrant update inside the updater closure**: the closure runs
//!   while the cell is borrowed; calling `set`/`update` on the same cell
//!   from inside it panics (RefCell borrow rules). Subscribers run after the
//!   borrow is released and may write freely.
//! - **Subscriber leak**: subscribers are held weakly. Dropping the
//!   [`StateSubscription`] guard unsubscribes; dead entries are pruned on
//!   the next notification.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct StateInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<CallbackWeak<T>>,
}

/// A shared, version-tracked value cell.
///
/// Cloning a `State` creates a new handle to the **same** cell.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing write.
/// 2. Writing a value equal to the current one is a no-op.
/// 3. Subscribers are notified in registration order, after the write
///    is complete.
pub struct State<T> {
    inner: Rc<RefCell<StateInner<T>>>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for State<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("State")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> State<T> {
    /// Create a new cell holding `value` at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StateInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current snapshot.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current snapshot without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the snapshot. Returns `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return false;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
        true
    }

    /// Functional update: compute the next snapshot from the previous one.
    ///
    /// Returns `true` if the value changed.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            let next = f(&inner.value);
            if next == inner.value {
                return false;
            }
            inner.value = next;
            inner.version += 1;
        }
        self.notify();
        true
    }

    /// Functional update that also yields a side value computed alongside
    /// the next snapshot (e.g. the effect of a reducer).
    pub fn update_with<R>(&self, f: impl FnOnce(&T) -> (T, R)) -> R {
        let (changed, out) = {
            let mut inner = self.inner.borrow_mut();
            let (next, out) = f(&inner.value);
            let changed = next != inner.value;
            if changed {
                inner.value = next;
                inner.version += 1;
            }
            (changed, out)
        };
        if changed {
            self.notify();
        }
        out
    }

    /// Subscribe to value changes.
    ///
    /// The callback runs with the new snapshot after each change. Dropping
    /// the returned guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> StateSubscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        StateSubscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of value-changing writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        let (callbacks, value) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let live: Vec<CallbackRc<T>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            if live.is_empty() {
                return;
            }
            (live, inner.value.clone())
        };
        tracing::trace!(
            message = "state.notify",
            subscribers = callbacks.len(),
            version = self.version()
        );
        for cb in &callbacks {
            cb(&value);
        }
    }
}

/// RAII guard for a [`State`] subscriber.
pub struct StateSubscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for StateSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateSubscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_set_basic() {
        let state = State::new(42);
        assert_eq!(state.get(), 42);
        assert_eq!(state.version(), 0);

        assert!(state.set(99));
        assert_eq!(state.get(), 99);
        assert_eq!(state.version(), 1);
    }

    #[test]
    fn same_value_is_a_no_op() {
        let state = State::new(42);
        assert!(!state.set(42));
        assert!(!state.update(|v| *v));
        assert_eq!(state.version(), 0);
    }

    #[test]
    fn functional_update_sees_previous_snapshot() {
        let state = State::new(vec![1, 2, 3]);
        state.update(|prev| {
            let mut next = prev.clone();
            next.push(4);
            next
        });
        assert_eq!(state.get(), vec![1, 2, 3, 4]);
        assert_eq!(state.version(), 1);
    }

    #[test]
    fn update_with_returns_side_value() {
        let state = State::new(10);
        let doubled = state.update_with(|prev| (prev + 1, prev * 2));
        assert_eq!(doubled, 20);
        assert_eq!(state.get(), 11);

        let unchanged = state.update_with(|prev| (*prev, "same"));
        assert_eq!(unchanged, "same");
        assert_eq!(state.version(), 1);
    }

    #[test]
    fn clones_share_the_cell() {
        let a = State::new(String::from("x"));
        let b = a.clone();
        b.set(String::from("y"));
        assert_eq!(a.get(), "y");
    }

    #[test]
    fn subscribers_notified_in_order() {
        let state = State::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _s1 = state.subscribe(move |v| l1.borrow_mut().push(("first", *v)));
        let l2 = Rc::clone(&log);
        let _s2 = state.subscribe(move |v| l2.borrow_mut().push(("second", *v)));

        state.set(5);
        assert_eq!(*log.borrow(), vec![("first", 5), ("second", 5)]);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let state = State::new(0);
        let count = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&count);
        let sub = state.subscribe(move |_| c.set(c.get() + 1));

        state.set(1);
        drop(sub);
        state.set(2);

        assert_eq!(count.get(), 1);
        assert_eq!(state.subscriber_count(), 0, "dead subscriber pruned");
    }

    #[test]
    fn subscriber_may_write_to_the_cell() {
        let state = State::new(0);
        let handle = state.clone();
        let _sub = state.subscribe(move |v| {
            if *v == 1 {
                handle.set(2);
            }
        });
        state.set(1);
        assert_eq!(state.get(), 2);
    }
}
