#![forbid(unsafe_code)]

//! Windowing over a long sequence of fixed-height rows.
//!
//! [`Windowing`] is the contract the viewport coupler needs from a
//! virtualized list. [`VirtualList`] is the default implementation: an
//! integer scroll offset over `item_count` rows, with `overscan` extra rows
//! rendered on each side of the viewport.

use std::ops::Range;

/// A windowing primitive over `item_count` rows.
pub trait Windowing {
    /// Update the number of rows. The scroll offset is clamped to fit.
    fn set_item_count(&mut self, count: usize);

    /// Current number of rows.
    fn item_count(&self) -> usize;

    /// Scroll the minimum distance that brings `index` into the viewport.
    fn scroll_to(&mut self, index: usize);

    /// Like [`scroll_to`](Self::scroll_to), reporting whether the offset moved.
    fn ensure_visible(&mut self, index: usize) -> bool;

    /// Rows to render: the viewport widened by overscan, clamped to the list.
    fn visible_range(&self) -> Range<usize>;

    /// Vertical offset of row `index` in cells.
    fn item_offset(&self, index: usize) -> f64;
}

/// Default [`Windowing`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualList {
    item_count: usize,
    viewport_height: usize,
    item_height: usize,
    overscan: usize,
    offset: usize,
}

impl VirtualList {
    /// Create a list with one-cell rows. Zero sizes are raised to 1.
    #[must_use]
    pub fn new(item_count: usize, viewport_height: usize, overscan: usize) -> Self {
        Self {
            item_count,
            viewport_height: viewport_height.max(1),
            item_height: 1,
            overscan,
            offset: 0,
        }
    }

    /// Set the row height in cells. Zero is raised to 1.
    #[must_use]
    pub fn with_item_height(mut self, item_height: usize) -> Self {
        self.item_height = item_height.max(1);
        self.clamp_offset();
        self
    }

    /// Index of the first row in the viewport.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Viewport height in cells.
    #[must_use]
    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Overscan rows on each side.
    #[must_use]
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Rows that fit in the viewport (at least one).
    #[must_use]
    pub fn rows_per_page(&self) -> usize {
        (self.viewport_height / self.item_height).max(1)
    }

    fn max_offset(&self) -> usize {
        self.item_count.saturating_sub(self.rows_per_page())
    }

    fn clamp_offset(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}

impl Windowing for VirtualList {
    fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
        self.clamp_offset();
    }

    fn item_count(&self) -> usize {
        self.item_count
    }

    fn scroll_to(&mut self, index: usize) {
        if self.item_count == 0 {
            self.offset = 0;
            return;
        }
        let index = index.min(self.item_count - 1);
        let page = self.rows_per_page();
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + page {
            self.offset = index + 1 - page;
        }
        self.clamp_offset();
    }

    fn ensure_visible(&mut self, index: usize) -> bool {
        let before = self.offset;
        self.scroll_to(index);
        self.offset != before
    }

    fn visible_range(&self) -> Range<usize> {
        if self.item_count == 0 {
            return 0..0;
        }
        let start = self.offset.saturating_sub(self.overscan);
        let end = self
            .offset
            .saturating_add(self.rows_per_page())
            .saturating_add(self.overscan)
            .min(self.item_count);
        start..end
    }

    fn item_offset(&self, index: usize) -> f64 {
        index.saturating_mul(self.item_height) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_last_of_five_scrolls_it_into_range() {
        let mut list = VirtualList::new(5, 3, 1);
        list.scroll_to(4);
        assert_eq!(list.offset(), 2);
        let range = list.visible_range();
        assert!(range.contains(&4), "range {range:?} must contain 4");
        assert_eq!(range, 1..5);
    }

    #[test]
    fn scroll_to_moves_minimally() {
        let mut list = VirtualList::new(100, 10, 0);
        list.scroll_to(5);
        assert_eq!(list.offset(), 0, "already visible");
        list.scroll_to(10);
        assert_eq!(list.offset(), 1, "one past the bottom edge");
        list.scroll_to(0);
        assert_eq!(list.offset(), 0);
    }

    #[test]
    fn ensure_visible_reports_movement() {
        let mut list = VirtualList::new(20, 5, 0);
        assert!(!list.ensure_visible(3));
        assert!(list.ensure_visible(12));
        assert_eq!(list.offset(), 8);
        assert!(!list.ensure_visible(10));
    }

    #[test]
    fn overscan_is_clamped_at_edges() {
        let list = VirtualList::new(4, 10, 3);
        assert_eq!(list.visible_range(), 0..4);
    }

    #[test]
    fn shrinking_the_list_clamps_offset() {
        let mut list = VirtualList::new(50, 5, 0);
        list.scroll_to(49);
        assert_eq!(list.offset(), 45);
        list.set_item_count(6);
        assert_eq!(list.offset(), 1);
        list.set_item_count(0);
        assert_eq!(list.offset(), 0);
        assert_eq!(list.visible_range(), 0..0);
    }

    #[test]
    fn scroll_to_past_end_clamps_index() {
        let mut list = VirtualList::new(8, 3, 0);
        list.scroll_to(100);
        assert_eq!(list.offset(), 5);
    }

    #[test]
    fn item_offset_scales_with_height() {
        let list = VirtualList::new(10, 6, 0).with_item_height(2);
        assert_eq!(list.rows_per_page(), 3);
        assert_eq!(list.item_offset(4), 8.0);
    }

    #[test]
    fn zero_viewport_is_raised() {
        let list = VirtualList::new(3, 0, 0);
        assert_eq!(list.viewport_height(), 1);
        assert_eq!(list.visible_range(), 0..1);
    }
}
