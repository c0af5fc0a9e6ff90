//! Per-input-line projection.
//!
//! Exactly one `SplitLine` exists per input line. A line that does not wrap
//! is an `Identity` projection (one output row, identity mappings); a
//! wrapped line caches its mapping's verdict (row count and continuation
//! indent) at construction. Visibility is the only mutable attribute; a text
//! change replaces the whole value rather than mutating it.
//!
//! Invariants:
//! * `output_line_count()` is 0 while hidden, otherwise the cached count
//!   (always 1 for `Identity`).
//! * Row 0 starts at input offset 0; continuation row `i` starts at the
//!   mapping's `input_offset_of_output_position(i, 0)`, strictly increasing.
//! * Continuation row content is the indent plus the raw segment; its
//!   minimum column is the indent length plus 1.
//!
//! Every query except `output_line_count` and the visibility accessors
//! panics on a hidden line. The collection filters hidden lines out before
//! delegating, so hitting such a panic means a caller bypassed the
//! collection's API.

use view_text::{LineTokens, Position};
use view_wrap::{LineMapperFactory, LineMapping, WrapSettings};

use crate::model::TextModel;

/// Build the right projection for one line's text. The factory declining to
/// produce a mapping means the line fits unwrapped.
pub(crate) fn create_split_line(
    factory: &dyn LineMapperFactory,
    text: &str,
    settings: &WrapSettings,
    visible: bool,
) -> SplitLine {
    match factory.create_line_mapping(text, settings) {
        None => SplitLine::identity(visible),
        Some(mapping) => SplitLine::wrapped(mapping, visible),
    }
}

#[derive(Debug)]
pub enum SplitLine {
    Identity(IdentityLine),
    Wrapped(WrappedLine),
}

#[derive(Debug)]
pub struct IdentityLine {
    visible: bool,
}

#[derive(Debug)]
pub struct WrappedLine {
    mapping: Box<dyn LineMapping>,
    /// Cached `mapping.wrapped_lines_indent()`.
    indent: String,
    /// Cached `mapping.output_line_count()`.
    output_count: usize,
    visible: bool,
}

impl SplitLine {
    pub fn identity(visible: bool) -> Self {
        Self::Identity(IdentityLine { visible })
    }

    pub fn wrapped(mapping: Box<dyn LineMapping>, visible: bool) -> Self {
        let indent = mapping.wrapped_lines_indent().to_string();
        let output_count = mapping.output_line_count();
        debug_assert!(output_count >= 1, "a mapping projects at least one row");
        Self::Wrapped(WrappedLine {
            mapping,
            indent,
            output_count,
            visible,
        })
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Self::Identity(line) => line.visible,
            Self::Wrapped(line) => line.visible,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        match self {
            Self::Identity(line) => line.visible = visible,
            Self::Wrapped(line) => line.visible = visible,
        }
    }

    /// Output rows this line contributes: 0 while hidden.
    pub fn output_line_count(&self) -> usize {
        if !self.is_visible() {
            return 0;
        }
        match self {
            Self::Identity(_) => 1,
            Self::Wrapped(line) => line.output_count,
        }
    }

    /// # Panics
    /// On a hidden line, and on a row index at or past the output count.
    pub fn output_line_content(
        &self,
        model: &dyn TextModel,
        my_line_number: usize,
        output_line_index: usize,
    ) -> String {
        self.assert_row(output_line_index);
        match self {
            Self::Identity(_) => model.line_content(my_line_number),
            Self::Wrapped(line) => {
                let (start, end) = line.segment_bounds(model, my_line_number, output_line_index);
                let content = model.line_content(my_line_number);
                let segment = &content[start..end];
                if output_line_index == 0 {
                    segment.to_string()
                } else {
                    format!("{}{}", line.indent, segment)
                }
            }
        }
    }

    /// # Panics
    /// On a hidden line, and on a row index at or past the output count.
    pub fn output_line_min_column(
        &self,
        model: &dyn TextModel,
        my_line_number: usize,
        output_line_index: usize,
    ) -> usize {
        self.assert_row(output_line_index);
        match self {
            Self::Identity(_) => model.line_min_column(my_line_number),
            Self::Wrapped(line) => {
                if output_line_index == 0 {
                    1
                } else {
                    line.indent.len() + 1
                }
            }
        }
    }

    /// # Panics
    /// On a hidden line, and on a row index at or past the output count.
    pub fn output_line_max_column(
        &self,
        model: &dyn TextModel,
        my_line_number: usize,
        output_line_index: usize,
    ) -> usize {
        self.assert_row(output_line_index);
        match self {
            Self::Identity(_) => model.line_max_column(my_line_number),
            Self::Wrapped(line) => {
                let (start, end) = line.segment_bounds(model, my_line_number, output_line_index);
                let indent = if output_line_index == 0 {
                    0
                } else {
                    line.indent.len()
                };
                indent + (end - start) + 1
            }
        }
    }

    /// Tokens restricted to one output row. Continuation rows are shifted by
    /// the indent length; the indent itself stays untokenized padding.
    ///
    /// # Panics
    /// On a hidden line, and on a row index at or past the output count.
    pub fn output_line_tokens(
        &self,
        model: &dyn TextModel,
        my_line_number: usize,
        output_line_index: usize,
        inaccurate: bool,
    ) -> LineTokens {
        self.assert_row(output_line_index);
        match self {
            Self::Identity(_) => {
                let tokens = model.line_tokens(my_line_number, inaccurate);
                let length = model.line_max_column(my_line_number) - 1;
                tokens.filter(0, length, 0)
            }
            Self::Wrapped(line) => {
                let (start, end) = line.segment_bounds(model, my_line_number, output_line_index);
                let delta = if output_line_index == 0 {
                    0
                } else {
                    line.indent.len()
                };
                model
                    .line_tokens(my_line_number, inaccurate)
                    .filter(start, end, delta)
            }
        }
    }

    /// Input column of `(output_line_index, output_column)`. Output columns
    /// inside a continuation row's indent clamp to the wrapped segment's
    /// start.
    ///
    /// # Panics
    /// On a hidden line.
    pub fn input_column_of_output_position(
        &self,
        output_line_index: usize,
        output_column: usize,
    ) -> usize {
        assert!(self.is_visible(), "column query on a hidden line");
        match self {
            Self::Identity(_) => output_column,
            Self::Wrapped(line) => {
                let mut adjusted = output_column - 1;
                if output_line_index > 0 {
                    adjusted = adjusted.saturating_sub(line.indent.len());
                }
                line.mapping
                    .input_offset_of_output_position(output_line_index, adjusted)
                    + 1
            }
        }
    }

    /// Output position of an input column. `delta_line_number` is the output
    /// line number the collection assigned to this line's first row.
    ///
    /// # Panics
    /// On a hidden line.
    pub fn output_position_of_input_position(
        &self,
        delta_line_number: usize,
        input_column: usize,
    ) -> Position {
        assert!(self.is_visible(), "position query on a hidden line");
        match self {
            Self::Identity(_) => Position::new(delta_line_number, input_column),
            Self::Wrapped(line) => {
                let output = line.mapping.output_position_of_input_offset(input_column - 1);
                let delta_offset = if output.output_line_index > 0 {
                    line.indent.len()
                } else {
                    0
                };
                Position::new(
                    delta_line_number + output.output_line_index,
                    output.output_offset + delta_offset + 1,
                )
            }
        }
    }

    fn assert_row(&self, output_line_index: usize) {
        assert!(self.is_visible(), "row query on a hidden line");
        let count = match self {
            Self::Identity(_) => 1,
            Self::Wrapped(line) => line.output_count,
        };
        assert!(
            output_line_index < count,
            "output row {output_line_index} out of bounds for {count} rows"
        );
    }
}

impl WrappedLine {
    /// Byte bounds of row `i`'s raw segment within the input line.
    fn segment_bounds(
        &self,
        model: &dyn TextModel,
        my_line_number: usize,
        output_line_index: usize,
    ) -> (usize, usize) {
        let start = if output_line_index == 0 {
            0
        } else {
            self.mapping
                .input_offset_of_output_position(output_line_index, 0)
        };
        let end = if output_line_index + 1 < self.output_count {
            self.mapping
                .input_offset_of_output_position(output_line_index + 1, 0)
        } else {
            model.line_max_column(my_line_number) - 1
        };
        (start, end)
    }
}
