//! Grapheme-cluster column costing.
//!
//! The view layer treats column widths as an input: every width decision
//! flows through [`cell_width`] so wrapping and rendering agree. Costing
//! rules:
//! * a tab advances to the next tab stop, so its cost depends on the visible
//!   column it starts at;
//! * clusters the terminal renders double-width cost a configurable number
//!   of columns (hosts aligning with legacy CJK renderers may pass 2 or
//!   more);
//! * everything else costs its `unicode-width` width, floored at 1 so
//!   zero-width clusters still occupy a cell when standing alone.
//!
//! Width classification intentionally over-estimates ambiguous emoji the
//! same way the underlying crate does; over-estimation wraps a little early,
//! under-estimation would overflow the wrapping column.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Column cost of one grapheme cluster starting at `visible_column`
/// (0-based) with the given tab size and full-width cost.
pub fn cell_width(
    cluster: &str,
    visible_column: usize,
    tab_size: usize,
    columns_for_full_width_char: usize,
) -> usize {
    if cluster == "\t" {
        let tab_size = tab_size.max(1);
        return tab_size - (visible_column % tab_size);
    }
    match cluster.width() {
        0 => 1,
        1 => 1,
        _ => columns_for_full_width_char.max(1),
    }
}

/// Visible width of a whole string starting at column 0. Used for indent
/// measurement; iterates grapheme clusters so multi-codepoint clusters are
/// costed once.
pub fn visible_width(text: &str, tab_size: usize, columns_for_full_width_char: usize) -> usize {
    let mut column = 0usize;
    for cluster in text.graphemes(true) {
        column += cell_width(cluster, column, tab_size, columns_for_full_width_char);
    }
    column
}
