#![forbid(unsafe_code)]

//! Navigator configuration.
//!
//! [`NavigatorConfig`] gathers every construction-time setting of a tree,
//! list, or todo widget. Build it with the chained setters, or load it from
//! TOML or JSON with the `config-file` feature:
//!
//! ```toml
//! searchable = true
//! multi_select = false
//! indent_size = 4
//! guide_style = "ascii"
//! viewport_height = 20
//! ```
//!
//! ```rust,ignore
//! let config = NavigatorConfig::from_toml_file("tree.toml")?;
//! let tree = Tree::try_new(nodes, config)?;
//! ```
//!
//! # Defaults
//!
//! Indent 2, Unicode guides shown, viewport 10 rows with 2 rows of overscan,
//! smooth scrolling on, page size equal to the viewport height, nothing
//! expanded, no search, no multi-select.
//!
//! # Validation
//!
//! [`NavigatorConfig::validate`] runs at construction. Loaded configs are
//! validated before they are returned.

#[cfg(feature = "config-file")]
use std::path::Path;

use crate::error::{ConfigError, MAX_INDENT_SIZE};
use crate::flatten::GuideStyle;
use crate::node::Node;
use crate::visibility::FilterMatcher;

/// Construction-time settings for a navigator.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "config-file", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct NavigatorConfig {
    /// Seed every branch as expanded.
    pub expand_all: bool,
    /// Seed every branch as collapsed.
    pub collapse_all: bool,
    /// Columns per depth level.
    pub indent_size: usize,
    /// Tab/Space toggle checkboxes.
    pub multi_select: bool,
    /// Printable keys edit a filter.
    pub searchable: bool,
    /// Filter predicate. Not serialized.
    #[cfg_attr(feature = "config-file", serde(skip))]
    pub filter: FilterMatcher,
    /// Rows per PageUp/PageDown; `None` uses the viewport height.
    pub page_size: Option<usize>,
    /// Guide character set.
    pub guide_style: GuideStyle,
    /// Draw guides instead of plain indentation.
    pub show_guides: bool,
    /// Folder/file icons for nodes without their own.
    pub show_default_icons: bool,
    /// Rows in the viewport.
    pub viewport_height: usize,
    /// Extra rows rendered above and below the viewport.
    pub overscan: usize,
    /// Ease the scroll position toward the selection.
    pub smooth_scroll: bool,
    /// Placeholder when there are no nodes.
    pub empty_text: String,
    /// Placeholder when the filter matches nothing.
    pub no_match_text: String,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            expand_all: false,
            collapse_all: false,
            indent_size: 2,
            multi_select: false,
            searchable: false,
            filter: FilterMatcher::Substring,
            page_size: None,
            guide_style: GuideStyle::Unicode,
            show_guides: true,
            show_default_icons: false,
            viewport_height: 10,
            overscan: 2,
            smooth_scroll: true,
            empty_text: "No items".to_owned(),
            no_match_text: "No matches".to_owned(),
        }
    }
}

impl NavigatorConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every branch as expanded.
    #[must_use]
    pub fn expand_all(mut self, on: bool) -> Self {
        self.expand_all = on;
        self
    }

    /// Seed every branch as collapsed.
    #[must_use]
    pub fn collapse_all(mut self, on: bool) -> Self {
        self.collapse_all = on;
        self
    }

    /// Columns per depth level (1 to 16).
    #[must_use]
    pub fn indent_size(mut self, size: usize) -> Self {
        self.indent_size = size;
        self
    }

    /// Enable checkboxes.
    #[must_use]
    pub fn multi_select(mut self, on: bool) -> Self {
        self.multi_select = on;
        self
    }

    /// Enable type-to-filter.
    #[must_use]
    pub fn searchable(mut self, on: bool) -> Self {
        self.searchable = on;
        self
    }

    /// Replace the substring matcher with a custom predicate.
    #[must_use]
    pub fn filter_fn(
        mut self,
        predicate: impl Fn(&Node, &str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter = FilterMatcher::custom(predicate);
        self
    }

    /// Rows per page.
    #[must_use]
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Page by the viewport height.
    #[must_use]
    pub fn auto_page_size(mut self) -> Self {
        self.page_size = None;
        self
    }

    /// Guide character set.
    #[must_use]
    pub fn guide_style(mut self, style: GuideStyle) -> Self {
        self.guide_style = style;
        self
    }

    /// Draw guide lines.
    #[must_use]
    pub fn show_guides(mut self, on: bool) -> Self {
        self.show_guides = on;
        self
    }

    /// Use folder/file icons as a fallback.
    #[must_use]
    pub fn show_default_icons(mut self, on: bool) -> Self {
        self.show_default_icons = on;
        self
    }

    /// Rows in the viewport.
    #[must_use]
    pub fn viewport_height(mut self, rows: usize) -> Self {
        self.viewport_height = rows;
        self
    }

    /// Overscan rows on each side.
    #[must_use]
    pub fn overscan(mut self, rows: usize) -> Self {
        self.overscan = rows;
        self
    }

    /// Ease scrolling.
    #[must_use]
    pub fn smooth_scroll(mut self, on: bool) -> Self {
        self.smooth_scroll = on;
        self
    }

    /// Placeholder for an empty node list.
    #[must_use]
    pub fn empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = text.into();
        self
    }

    /// Placeholder when the filter matches nothing.
    #[must_use]
    pub fn no_match_text(mut self, text: impl Into<String>) -> Self {
        self.no_match_text = text.into();
        self
    }

    /// Rows moved by one page key.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        self.page_size.unwrap_or(self.viewport_height)
    }

    /// Reject out-of-range or contradictory settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == Some(0) {
            return Err(ConfigError::InvalidPageSize);
        }
        if self.indent_size == 0 || self.indent_size > MAX_INDENT_SIZE {
            return Err(ConfigError::InvalidIndentSize {
                got: self.indent_size,
                max: MAX_INDENT_SIZE,
            });
        }
        if self.viewport_height == 0 {
            return Err(ConfigError::InvalidViewport);
        }
        if self.expand_all && self.collapse_all {
            return Err(ConfigError::ConflictingExpansion);
        }
        Ok(())
    }

    /// Load and validate from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate from a TOML file.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load and validate from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate from a JSON file.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}
