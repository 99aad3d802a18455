#![forbid(unsafe_code)]

//! Row rendering: one visible entry to one line of styled spans.
//!
//! The renderer is a pure projection. It holds presentation settings only
//! and never looks at navigation state beyond the [`RowFlags`] it is given.
//!
//! Left to right a row is: checkbox (multi-select only), focus marker,
//! guides or plain indentation, expand glyph, icon, label, badge.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::flatten::{FlatEntry, GuideStyle, guide_prefix, plain_indent};
use crate::node::Node;

bitflags! {
    /// Semantic style of a span. A rendering backend maps these to colors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpanStyle: u8 {
        /// Bold text.
        const BOLD     = 0b0000_0001;
        /// Accent color (focused row).
        const ACCENT   = 0b0000_0010;
        /// Selection color (marked row).
        const SELECTED = 0b0000_0100;
        /// Tree guide lines.
        const GUIDE    = 0b0000_1000;
        /// De-emphasized text.
        const MUTED    = 0b0001_0000;
        /// Trailing badge.
        const BADGE    = 0b0010_0000;
        /// Checkbox, focus marker, and overflow markers.
        const MARKER   = 0b0100_0000;
    }
}

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Text content.
    pub text: String,
    /// Style flags.
    pub style: SpanStyle,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub fn new(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create an unstyled span.
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Self::new(text, SpanStyle::empty())
    }

    /// Display width in terminal columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.text.width()
    }
}

/// One rendered line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowLine {
    /// Spans, left to right.
    pub spans: Vec<Span>,
}

impl RowLine {
    /// An empty line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A muted single-span line such as "No items".
    #[must_use]
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self {
            spans: vec![Span::new(text, SpanStyle::MUTED)],
        }
    }

    /// A muted overflow marker such as "↑ 3 more".
    #[must_use]
    pub fn marker(text: impl Into<String>) -> Self {
        Self {
            spans: vec![Span::new(text, SpanStyle::MUTED | SpanStyle::MARKER)],
        }
    }

    /// Append a span, skipping empty text.
    pub fn push(&mut self, text: impl Into<String>, style: SpanStyle) {
        let text = text.into();
        if !text.is_empty() {
            self.spans.push(Span { text, style });
        }
    }

    /// Concatenated text without styles.
    #[must_use]
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Display width in terminal columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// Clip to `max_width` columns, ending in `…` when anything was cut.
    ///
    /// Clipping is grapheme aware, so wide characters and combining
    /// sequences are never split.
    #[must_use]
    pub fn truncate(&self, max_width: usize) -> RowLine {
        if self.width() <= max_width {
            return self.clone();
        }
        let mut out = RowLine::new();
        if max_width == 0 {
            return out;
        }
        let budget = max_width - 1;
        let mut used = 0usize;
        let mut last_style = SpanStyle::empty();
        'spans: for span in &self.spans {
            let mut kept = String::new();
            last_style = span.style;
            for grapheme in span.text.graphemes(true) {
                let w = grapheme.width();
                if used + w > budget {
                    out.push(kept, span.style);
                    break 'spans;
                }
                used += w;
                kept.push_str(grapheme);
            }
            out.push(kept, span.style);
        }
        out.push("\u{2026}", last_style);
        out
    }
}

impl fmt::Display for RowLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

/// Per-row state flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowFlags {
    /// Row holds the cursor.
    pub focused: bool,
    /// Effective expanded state (branches only).
    pub expanded: bool,
    /// Row is marked.
    pub selected: bool,
}

/// Caller-supplied label renderer.
pub type LabelFn = Arc<dyn Fn(&Node, RowFlags) -> Vec<Span> + Send + Sync>;

/// Default folder icon.
pub const FOLDER_ICON: &str = "\u{1F4C1}";
/// Default file icon.
pub const FILE_ICON: &str = "\u{1F4C4}";

/// Projects a [`FlatEntry`] into a [`RowLine`].
#[derive(Clone)]
pub struct RowRenderer {
    multi_select: bool,
    show_guides: bool,
    guide_style: GuideStyle,
    indent_size: usize,
    show_default_icons: bool,
    show_expand_glyph: bool,
    label_fn: Option<LabelFn>,
}

impl Default for RowRenderer {
    fn default() -> Self {
        Self {
            multi_select: false,
            show_guides: true,
            guide_style: GuideStyle::Unicode,
            indent_size: 2,
            show_default_icons: false,
            show_expand_glyph: true,
            label_fn: None,
        }
    }
}

impl fmt::Debug for RowRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowRenderer")
            .field("multi_select", &self.multi_select)
            .field("show_guides", &self.show_guides)
            .field("guide_style", &self.guide_style)
            .field("indent_size", &self.indent_size)
            .field("show_default_icons", &self.show_default_icons)
            .field("show_expand_glyph", &self.show_expand_glyph)
            .field("label_fn", &self.label_fn.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl RowRenderer {
    /// Renderer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show checkboxes.
    #[must_use]
    pub fn with_multi_select(mut self, on: bool) -> Self {
        self.multi_select = on;
        self
    }

    /// Draw guides instead of plain indentation.
    #[must_use]
    pub fn with_guides(mut self, on: bool) -> Self {
        self.show_guides = on;
        self
    }

    /// Guide character set.
    #[must_use]
    pub fn with_guide_style(mut self, style: GuideStyle) -> Self {
        self.guide_style = style;
        self
    }

    /// Columns per depth level.
    #[must_use]
    pub fn with_indent_size(mut self, size: usize) -> Self {
        self.indent_size = size;
        self
    }

    /// Fall back to folder/file icons for nodes without one.
    #[must_use]
    pub fn with_default_icons(mut self, on: bool) -> Self {
        self.show_default_icons = on;
        self
    }

    /// Draw the expand/collapse glyph column.
    #[must_use]
    pub fn with_expand_glyph(mut self, on: bool) -> Self {
        self.show_expand_glyph = on;
        self
    }

    /// Delegate label rendering to `f`.
    #[must_use]
    pub fn with_label_fn(
        mut self,
        f: impl Fn(&Node, RowFlags) -> Vec<Span> + Send + Sync + 'static,
    ) -> Self {
        self.label_fn = Some(Arc::new(f));
        self
    }

    /// Render one entry.
    #[must_use]
    pub fn render(&self, entry: &FlatEntry, flags: RowFlags) -> RowLine {
        let mut line = RowLine::new();

        if self.multi_select {
            let (box_text, style) = if flags.selected {
                ("[x] ", SpanStyle::MARKER | SpanStyle::SELECTED)
            } else {
                ("[ ] ", SpanStyle::MARKER)
            };
            line.push(box_text, style);
        }

        if flags.focused {
            line.push("\u{203A} ", SpanStyle::MARKER | SpanStyle::ACCENT);
        } else {
            line.push("  ", SpanStyle::empty());
        }

        if self.show_guides {
            line.push(
                guide_prefix(entry, self.guide_style, self.indent_size),
                SpanStyle::GUIDE,
            );
        } else {
            line.push(plain_indent(entry.depth, self.indent_size), SpanStyle::empty());
        }

        if self.show_expand_glyph {
            let glyph = match (entry.is_branch(), flags.expanded) {
                (true, true) => "\u{25BC} ",
                (true, false) => "\u{25B6} ",
                (false, _) => "  ",
            };
            line.push(glyph, SpanStyle::MUTED);
        }

        let icon = entry.node.icon().or_else(|| {
            self.show_default_icons.then(|| {
                if entry.is_branch() {
                    FOLDER_ICON
                } else {
                    FILE_ICON
                }
            })
        });
        if let Some(icon) = icon {
            line.push(format!("{icon} "), SpanStyle::empty());
        }

        match &self.label_fn {
            Some(label_fn) => {
                for span in label_fn(&entry.node, flags) {
                    line.push(span.text, span.style);
                }
            }
            None => {
                let mut style = SpanStyle::empty();
                if flags.focused {
                    style |= SpanStyle::BOLD | SpanStyle::ACCENT;
                }
                if flags.selected {
                    style |= SpanStyle::SELECTED;
                }
                line.push(entry.node.label(), style);
            }
        }

        if let Some(badge) = entry.node.badge() {
            line.push(format!(" [{badge}]"), SpanStyle::BADGE | SpanStyle::MUTED);
        }

        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten;

    fn entries() -> Vec<FlatEntry> {
        flatten(&[Node::new("src")
            .with_expanded(true)
            .with_children([Node::new("main.rs").with_badge("M"), Node::from("lib.rs")])])
    }

    #[test]
    fn focused_expanded_branch() {
        let flat = entries();
        let line = RowRenderer::new().render(&flat[0], RowFlags {
            focused: true,
            expanded: true,
            selected: false,
        });
        assert_eq!(line.text(), "\u{203A} \u{25BC} src");
        let label = line.spans.last().expect("label span");
        assert_eq!(label.style, SpanStyle::BOLD | SpanStyle::ACCENT);
    }

    #[test]
    fn collapsed_branch_glyph() {
        let flat = entries();
        let line = RowRenderer::new().render(&flat[0], RowFlags::default());
        assert_eq!(line.text(), "  \u{25B6} src");
    }

    #[test]
    fn child_row_with_guides_and_badge() {
        let flat = entries();
        let line = RowRenderer::new().render(&flat[1], RowFlags::default());
        assert_eq!(line.text(), "  \u{251C}\u{2500}  main.rs [M]");
        let badge = line.spans.last().expect("badge span");
        assert!(badge.style.contains(SpanStyle::BADGE));
    }

    #[test]
    fn plain_indentation_without_guides() {
        let flat = entries();
        let line = RowRenderer::new()
            .with_guides(false)
            .with_indent_size(4)
            .render(&flat[2], RowFlags::default());
        assert_eq!(line.text(), "        lib.rs");
    }

    #[test]
    fn checkbox_reflects_selection() {
        let flat = entries();
        let renderer = RowRenderer::new().with_multi_select(true).with_expand_glyph(false);
        let checked = renderer.render(&flat[2], RowFlags {
            selected: true,
            ..RowFlags::default()
        });
        assert!(checked.text().starts_with("[x] "));
        assert_eq!(
            checked.spans.last().map(|s| s.style),
            Some(SpanStyle::SELECTED)
        );
        let unchecked = renderer.render(&flat[2], RowFlags::default());
        assert!(unchecked.text().starts_with("[ ]   "));
    }

    #[test]
    fn icons_prefer_node_then_default() {
        let flat = flatten(&[Node::new("a").with_icon("*"), Node::new("dir").child("f")]);
        let renderer = RowRenderer::new().with_default_icons(true).with_expand_glyph(false);
        assert!(renderer.render(&flat[0], RowFlags::default()).text().contains("* a"));
        assert!(
            renderer
                .render(&flat[1], RowFlags::default())
                .text()
                .contains(FOLDER_ICON)
        );
        assert!(
            renderer
                .render(&flat[2], RowFlags::default())
                .text()
                .contains(FILE_ICON)
        );
    }

    #[test]
    fn label_fn_replaces_label() {
        let flat = entries();
        let renderer = RowRenderer::new().with_label_fn(|node, flags| {
            let style = if flags.focused { SpanStyle::BOLD } else { SpanStyle::MUTED };
            vec![Span::new(node.label().to_uppercase(), style)]
        });
        let line = renderer.render(&flat[2], RowFlags::default());
        assert!(line.text().ends_with("LIB.RS"));
    }

    #[test]
    fn truncate_adds_ellipsis() {
        let mut line = RowLine::new();
        line.push("hello ", SpanStyle::empty());
        line.push("world", SpanStyle::BOLD);
        assert_eq!(line.truncate(20), line);
        let cut = line.truncate(8);
        assert_eq!(cut.text(), "hello w\u{2026}");
        assert_eq!(cut.width(), 8);
        assert!(line.truncate(0).spans.is_empty());
    }

    #[test]
    fn truncate_never_splits_wide_graphemes() {
        let mut line = RowLine::new();
        line.push("\u{4F60}\u{597D}\u{4E16}\u{754C}", SpanStyle::empty());
        let cut = line.truncate(4);
        assert_eq!(cut.text(), "\u{4F60}\u{2026}");
        assert!(cut.width() <= 4);
    }

    #[test]
    fn placeholder_is_muted() {
        let line = RowLine::placeholder("No items");
        assert_eq!(line.to_string(), "No items");
        assert_eq!(line.spans[0].style, SpanStyle::MUTED);
    }
}
