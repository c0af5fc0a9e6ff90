//! Monospace word wrapping.
//!
//! One forward walk over the line's grapheme clusters, tracking the visible
//! column and the most recent break opportunity. A break lands on the
//! opportunity when one exists inside the current row, otherwise hard
//! between clusters at the column boundary. Continuation rows start their
//! visible column at the indent width, so indented rows wrap earlier.
//!
//! A single cluster wider than the remaining room is never split; the row
//! overflows instead. Break offsets are cluster boundaries, so every offset
//! the produced mapping reports is a valid char boundary of the line.

use unicode_segmentation::UnicodeSegmentation;
use view_sum::PrefixSums;
use view_text::width::{cell_width, visible_width};

use crate::{LineMapperFactory, LineMapping, OutputPosition, WrapSettings, WrappingIndent};

/// Break preferred after whitespace, closers and a CJK punctuation subset.
const DEFAULT_BREAK_AFTER: &str = " \t})]?|&,;、。，．：；？！」』】〕）］｝";
/// Break preferred before openers.
const DEFAULT_BREAK_BEFORE: &str = "([{「『【〔（［｛";

/// [`LineMapping`] backed by prefix sums over wrapped segment byte lengths.
///
/// `input_offset_of_output_position(i, off)` is `accumulated(i - 1) + off`;
/// the inverse is a single `index_of` lookup. Also usable directly by hosts
/// (and tests) that compute break offsets themselves.
#[derive(Debug)]
pub struct WrappedLineMapping {
    segments: PrefixSums,
    indent: String,
}

impl WrappedLineMapping {
    /// `segment_lengths` are the byte lengths of the output rows, in order;
    /// must be non-empty with every length positive.
    pub fn new(segment_lengths: Vec<usize>, indent: String) -> Self {
        assert!(!segment_lengths.is_empty(), "a line maps to at least one row");
        debug_assert!(
            segment_lengths.iter().all(|&len| len > 0),
            "wrapped segments are never empty"
        );
        Self {
            segments: PrefixSums::from_values(segment_lengths),
            indent,
        }
    }
}

impl LineMapping for WrappedLineMapping {
    fn output_line_count(&self) -> usize {
        self.segments.len()
    }

    fn wrapped_lines_indent(&self) -> &str {
        &self.indent
    }

    fn input_offset_of_output_position(
        &self,
        output_line_index: usize,
        output_offset: usize,
    ) -> usize {
        if output_line_index == 0 {
            output_offset
        } else {
            self.segments.accumulated(output_line_index - 1) + output_offset
        }
    }

    fn output_position_of_input_offset(&self, input_offset: usize) -> OutputPosition {
        let found = self.segments.index_of(input_offset);
        OutputPosition::new(found.index, found.remainder)
    }
}

/// Character-classification word wrapper for monospace output.
#[derive(Debug, Clone)]
pub struct WordWrapFactory {
    break_before: Vec<char>,
    break_after: Vec<char>,
}

impl Default for WordWrapFactory {
    fn default() -> Self {
        Self::new(DEFAULT_BREAK_BEFORE, DEFAULT_BREAK_AFTER)
    }
}

impl WordWrapFactory {
    pub fn new(break_before: &str, break_after: &str) -> Self {
        Self {
            break_before: break_before.chars().collect(),
            break_after: break_after.chars().collect(),
        }
    }

    fn breaks_before(&self, cluster: &str) -> bool {
        cluster
            .chars()
            .next()
            .is_some_and(|c| self.break_before.contains(&c))
    }

    fn breaks_after(&self, cluster: &str) -> bool {
        cluster
            .chars()
            .next()
            .is_some_and(|c| self.break_after.contains(&c))
    }
}

impl LineMapperFactory for WordWrapFactory {
    fn create_line_mapping(
        &self,
        text: &str,
        settings: &WrapSettings,
    ) -> Option<Box<dyn LineMapping>> {
        let wrapping_column = settings.wrapping_column?;
        if wrapping_column == 0 || text.is_empty() {
            return None;
        }
        let tab_size = settings.tab_size;
        let full_width = settings.columns_for_full_width_char;

        let clusters: Vec<(usize, &str)> = text.grapheme_indices(true).collect();

        let mut segment_lengths: Vec<usize> = Vec::new();
        let mut segment_start = 0usize;
        let mut visible = 0usize;
        let mut break_candidate: Option<usize> = None;
        let mut indent: Option<(String, usize)> = None;

        let mut idx = 0usize;
        while idx < clusters.len() {
            let (offset, cluster) = clusters[idx];
            if offset > segment_start && self.breaks_before(cluster) {
                break_candidate = Some(offset);
            }
            let width = cell_width(cluster, visible, tab_size, full_width);
            if visible + width > wrapping_column && offset > segment_start {
                let break_at = break_candidate
                    .filter(|&b| b > segment_start)
                    .unwrap_or(offset);
                if indent.is_none() {
                    indent = Some(wrapped_indent(text, settings, wrapping_column));
                }
                let indent_width = indent.as_ref().map(|(_, w)| *w).unwrap_or(0);
                segment_lengths.push(break_at - segment_start);
                segment_start = break_at;
                break_candidate = None;
                // Clusters between the chosen break and the current one move
                // to the new row; recost them at their new columns and
                // re-register any break opportunities they carry.
                let mut first_moved = idx;
                while first_moved > 0 && clusters[first_moved - 1].0 >= break_at {
                    first_moved -= 1;
                }
                visible = indent_width;
                for moved in first_moved..idx {
                    let (moved_offset, moved_cluster) = clusters[moved];
                    if moved_offset > segment_start && self.breaks_before(moved_cluster) {
                        break_candidate = Some(moved_offset);
                    }
                    visible += cell_width(moved_cluster, visible, tab_size, full_width);
                    if self.breaks_after(moved_cluster) {
                        let end = clusters
                            .get(moved + 1)
                            .map_or(text.len(), |&(next_offset, _)| next_offset);
                        break_candidate = Some(end);
                    }
                }
                // Reprocess the current cluster on the new row.
                continue;
            }
            visible += width;
            if self.breaks_after(cluster) {
                let end = clusters
                    .get(idx + 1)
                    .map_or(text.len(), |&(next_offset, _)| next_offset);
                break_candidate = Some(end);
            }
            idx += 1;
        }

        if segment_lengths.is_empty() {
            return None;
        }
        segment_lengths.push(text.len() - segment_start);
        let (indent, _) = indent.unwrap_or_default();
        Some(Box::new(WrappedLineMapping::new(segment_lengths, indent)))
    }
}

/// Continuation indent per policy, with the room guard: an indent that would
/// leave less than one full-width character before the wrapping column is
/// dropped entirely.
fn wrapped_indent(text: &str, settings: &WrapSettings, wrapping_column: usize) -> (String, usize) {
    if settings.wrapping_indent == WrappingIndent::None {
        return (String::new(), 0);
    }
    let end = text
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(text.len());
    let mut prefix = text[..end].to_string();
    if settings.wrapping_indent == WrappingIndent::Indent {
        prefix.push('\t');
    }
    let width = visible_width(
        &prefix,
        settings.tab_size,
        settings.columns_for_full_width_char,
    );
    if width + settings.columns_for_full_width_char.max(1) > wrapping_column {
        (String::new(), 0)
    } else {
        (prefix, width)
    }
}
