//! Wrap configuration.
//!
//! Deserializable from the host's TOML configuration; unknown fields are
//! tolerated and every field has a default so a partial `[wrapping]` table
//! parses.

use serde::Deserialize;

/// Continuation-indent policy for wrapped lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrappingIndent {
    /// Continuation rows start at column 1.
    #[default]
    None,
    /// Continuation rows repeat the line's leading whitespace.
    Same,
    /// Continuation rows repeat the leading whitespace plus one extra tab.
    Indent,
}

/// The wrapping knobs the projection layer needs. Column widths are byte
/// lengths except for the two visual costs (`tab_size`,
/// `columns_for_full_width_char`), which are terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WrapSettings {
    pub tab_size: usize,
    /// `None` disables soft wrapping entirely.
    pub wrapping_column: Option<usize>,
    /// Cell cost of a double-width cluster; legacy CJK hosts may pass 3.
    pub columns_for_full_width_char: usize,
    pub wrapping_indent: WrappingIndent,
}

impl Default for WrapSettings {
    fn default() -> Self {
        Self {
            tab_size: 4,
            wrapping_column: None,
            columns_for_full_width_char: 2,
            wrapping_indent: WrappingIndent::None,
        }
    }
}

impl WrapSettings {
    /// Convenience constructor for hosts that configure programmatically.
    pub fn new(
        tab_size: usize,
        wrapping_column: Option<usize>,
        columns_for_full_width_char: usize,
        wrapping_indent: WrappingIndent,
    ) -> Self {
        Self {
            tab_size,
            wrapping_column,
            columns_for_full_width_char,
            wrapping_indent,
        }
    }
}
