#![forbid(unsafe_code)]

//! Couples the visible sequence to a windowing primitive and a scroll easer.
//!
//! The coupler owns no scroll math. Per render it feeds the visible length
//! and selection to a [`Windowing`] implementation; on selection changes it
//! retargets a [`ScrollEaser`]; on each animation tick it advances the easer.
//!
//! ```
//! use arbor_widgets::viewport::ViewportCoupler;
//!
//! let mut coupler = ViewportCoupler::with_defaults(3, 1, true);
//! coupler.sync(5, 4);
//! let window = coupler.window();
//! assert!(window.start <= 4 && 4 < window.end);
//! assert_eq!(window.more_above().as_deref(), Some("↑ 1 more"));
//! ```

use std::ops::Range;
use std::time::Duration;

use arbor_core::animation::SmoothScroller;

use crate::virtual_list::{VirtualList, Windowing};

/// Cadence of the scroll animation interval.
pub const ANIMATION_TICK: Duration = Duration::from_millis(16);

/// A two-axis scroll easer.
pub trait ScrollEaser {
    /// Retarget the animation.
    fn set_target(&mut self, x: f64, y: f64);
    /// Advance by `delta_seconds`.
    fn update(&mut self, delta_seconds: f64);
    /// Whether the easer has not yet settled.
    fn is_animating(&self) -> bool;
    /// Current animated position.
    fn position(&self) -> (f64, f64);
}

impl ScrollEaser for SmoothScroller {
    fn set_target(&mut self, x: f64, y: f64) {
        SmoothScroller::set_target(self, x, y);
    }

    fn update(&mut self, delta_seconds: f64) {
        SmoothScroller::update(self, delta_seconds);
    }

    fn is_animating(&self) -> bool {
        SmoothScroller::is_animating(self)
    }

    fn position(&self) -> (f64, f64) {
        SmoothScroller::position(self)
    }
}

/// The rows to draw plus how many rows lie outside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    /// First rendered index (inclusive).
    pub start: usize,
    /// Last rendered index (exclusive).
    pub end: usize,
    /// Rows before `start`.
    pub hidden_above: usize,
    /// Rows at or after `end`.
    pub hidden_below: usize,
}

impl Window {
    /// Build a window from a range over `item_count` rows.
    #[must_use]
    pub fn from_range(range: Range<usize>, item_count: usize) -> Self {
        let end = range.end.min(item_count);
        let start = range.start.min(end);
        Self {
            start,
            end,
            hidden_above: start,
            hidden_below: item_count - end,
        }
    }

    /// The window as a range.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of rendered rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether nothing is rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Leading marker text when rows are hidden above.
    #[must_use]
    pub fn more_above(&self) -> Option<String> {
        (self.hidden_above > 0).then(|| format!("\u{2191} {} more", self.hidden_above))
    }

    /// Trailing marker text when rows are hidden below.
    #[must_use]
    pub fn more_below(&self) -> Option<String> {
        (self.hidden_below > 0).then(|| format!("\u{2193} {} more", self.hidden_below))
    }
}

/// Adapter between the visible sequence and the windowing/easing primitives.
#[derive(Debug, Clone)]
pub struct ViewportCoupler<W = VirtualList, S = SmoothScroller> {
    list: W,
    easer: S,
    smooth_scroll: bool,
}

impl ViewportCoupler {
    /// Coupler over the default [`VirtualList`] and [`SmoothScroller`].
    #[must_use]
    pub fn with_defaults(viewport_height: usize, overscan: usize, smooth_scroll: bool) -> Self {
        Self::new(
            VirtualList::new(0, viewport_height, overscan),
            SmoothScroller::new(),
            smooth_scroll,
        )
    }
}

impl<W: Windowing, S: ScrollEaser> ViewportCoupler<W, S> {
    /// Couple `list` and `easer`.
    #[must_use]
    pub fn new(list: W, easer: S, smooth_scroll: bool) -> Self {
        Self {
            list,
            easer,
            smooth_scroll,
        }
    }

    /// Per-render sync: update the row count, then scroll to `selected`.
    pub fn sync(&mut self, item_count: usize, selected: usize) {
        self.list.set_item_count(item_count);
        self.list.scroll_to(selected);
    }

    /// React to a selection change.
    ///
    /// Returns whether the viewport offset moved.
    pub fn selection_changed(&mut self, index: usize) -> bool {
        let moved = self.list.ensure_visible(index);
        if self.smooth_scroll {
            let offset = self.list.item_offset(index);
            self.easer.set_target(0.0, offset);
        }
        moved
    }

    /// Advance the easer by `dt` while it is animating.
    ///
    /// Returns whether a step was taken.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if !self.smooth_scroll || !self.easer.is_animating() {
            return false;
        }
        self.easer.update(dt.as_secs_f64());
        true
    }

    /// Whether the easer is still moving.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.smooth_scroll && self.easer.is_animating()
    }

    /// The window to render for the current row count.
    #[must_use]
    pub fn window(&self) -> Window {
        Window::from_range(self.list.visible_range(), self.list.item_count())
    }

    /// Animated vertical scroll position.
    #[must_use]
    pub fn scroll_position(&self) -> f64 {
        self.easer.position().1
    }

    /// Whether smooth scrolling is enabled.
    #[must_use]
    pub fn smooth_scroll(&self) -> bool {
        self.smooth_scroll
    }

    /// The windowing primitive.
    #[must_use]
    pub fn list(&self) -> &W {
        &self.list
    }

    /// The windowing primitive, mutably.
    pub fn list_mut(&mut self) -> &mut W {
        &mut self.list
    }

    /// The scroll easer.
    #[must_use]
    pub fn easer(&self) -> &S {
        &self.easer
    }
}
