//! Per-line wrap decisions: where an input line breaks and what indent its
//! continuation rows carry.
//!
//! The split between this crate and `view-lines` is deliberate: a
//! [`LineMapping`] is an immutable, per-line verdict produced once from the
//! line's text and the wrap settings. The collection layer composes those
//! verdicts and owns all mutable state. Config changes therefore never
//! reflow incrementally; every line's mapping is recomputed from scratch,
//! which keeps the mapping contract all-or-nothing per line.
//!
//! Contract for implementors:
//! * `output_line_count() >= 1`; a factory returns `None` instead of a
//!   single-row mapping when the line does not wrap.
//! * `input_offset_of_output_position(i, 0)` is strictly increasing in `i`
//!   and `input_offset_of_output_position(0, 0) == 0`.
//! * All reported offsets lie on character boundaries of the line text.

mod settings;
mod word_wrap;

pub use settings::{WrapSettings, WrappingIndent};
pub use word_wrap::{WordWrapFactory, WrappedLineMapping};

/// A 0-based (output line index, output byte offset) pair inside one input
/// line's projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPosition {
    pub output_line_index: usize,
    pub output_offset: usize,
}

impl OutputPosition {
    pub fn new(output_line_index: usize, output_offset: usize) -> Self {
        Self {
            output_line_index,
            output_offset,
        }
    }
}

/// Immutable map between one input line's byte offsets and its output rows.
pub trait LineMapping: std::fmt::Debug {
    /// Number of output rows this line projects to.
    fn output_line_count(&self) -> usize;

    /// The visual indent prefixed to rows 1 and up. May be empty.
    fn wrapped_lines_indent(&self) -> &str;

    /// Input byte offset of `(output_line_index, output_offset)`. The offset
    /// is relative to the wrapped segment, not counting the indent.
    fn input_offset_of_output_position(
        &self,
        output_line_index: usize,
        output_offset: usize,
    ) -> usize;

    /// Output row and in-row offset of an input byte offset. An offset on a
    /// break boundary belongs to the row that starts there.
    fn output_position_of_input_offset(&self, input_offset: usize) -> OutputPosition;
}

/// Decides whether and where a line breaks. `None` means the line fits as a
/// single output row.
pub trait LineMapperFactory {
    fn create_line_mapping(
        &self,
        text: &str,
        settings: &WrapSettings,
    ) -> Option<Box<dyn LineMapping>>;
}
