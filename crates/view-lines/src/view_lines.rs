//! The aggregate projection over all input lines.
//!
//! `ViewLines` keeps one [`SplitLine`] per input line, 1:1 with the
//! document, and a [`PrefixSums`] over the per-line effective output counts.
//! Output-line indexing is one `index_of` lookup; everything else delegates
//! to the located line.
//!
//! Invariants after every public call:
//! * `lines.len()` equals the document's line count at the reconciled
//!   version.
//! * `prefix_sums` holds exactly each line's `output_line_count()` (0 for
//!   hidden lines).
//! * Hidden lines stay in `lines` with `visible = false`; they are never
//!   removed, which keeps input-line indexing O(1) and keeps hiding
//!   independent from the edit pipeline.
//!
//! Hidden ranges are not stored as line numbers; they live as decorations in
//! the host's marker engine and are re-read on demand, so edits move them
//! without this layer's involvement.
//!
//! Every query verifies the model's version against the version this
//! projection was last reconciled to and fails with
//! [`ViewError::StaleModel`] on mismatch; change events at or below the
//! reconciled version are replays and are discarded.

use tracing::{debug, trace};
use view_sum::PrefixSums;
use view_text::{LineTokens, Position, TextRange};
use view_wrap::{LineMapperFactory, WrapSettings, WrappingIndent};

use crate::error::ViewError;
use crate::event::{ViewEvent, ViewEventSink};
use crate::model::{DecorationId, TextModel};
use crate::split_line::{SplitLine, create_split_line};

pub struct ViewLines {
    lines: Vec<SplitLine>,
    prefix_sums: PrefixSums,
    hidden_area_ids: Vec<DecorationId>,
    valid_model_version_id: u64,
    settings: WrapSettings,
    factory: Box<dyn LineMapperFactory>,
}

impl ViewLines {
    /// Build the projection for the model's current state. All lines start
    /// visible.
    pub fn new(
        model: &mut dyn TextModel,
        factory: Box<dyn LineMapperFactory>,
        settings: WrapSettings,
    ) -> Self {
        let mut projection = Self {
            lines: Vec::new(),
            prefix_sums: PrefixSums::new(),
            hidden_area_ids: Vec::new(),
            valid_model_version_id: 0,
            settings,
            factory,
        };
        projection.construct_lines(model);
        projection
    }

    pub fn settings(&self) -> &WrapSettings {
        &self.settings
    }

    /// Release the decoration handles owned by this projection. Required
    /// before dropping; releasing needs the model, so `Drop` cannot do it.
    pub fn dispose(&mut self, model: &mut dyn TextModel) {
        self.hidden_area_ids = model.delta_decorations(&self.hidden_area_ids, &[]);
    }

    fn construct_lines(&mut self, model: &mut dyn TextModel) {
        self.valid_model_version_id = model.version_id();
        let contents = model.lines_content();
        self.lines = contents
            .iter()
            .map(|text| create_split_line(self.factory.as_ref(), text, &self.settings, true))
            .collect();
        self.hidden_area_ids = model.delta_decorations(&self.hidden_area_ids, &[]);
        self.prefix_sums =
            PrefixSums::from_values(self.lines.iter().map(|line| line.output_line_count()));
        debug!(
            lines = self.lines.len(),
            version = self.valid_model_version_id,
            "rebuilt line projection"
        );
    }

    // ---- configuration ---------------------------------------------------

    /// Returns false (and does nothing) when the value is unchanged;
    /// otherwise reconstructs every line and emits one `Flushed`.
    pub fn set_tab_size(
        &mut self,
        model: &mut dyn TextModel,
        tab_size: usize,
        sink: &mut dyn ViewEventSink,
    ) -> bool {
        if self.settings.tab_size == tab_size {
            return false;
        }
        self.settings.tab_size = tab_size;
        self.construct_lines(model);
        sink.handle(ViewEvent::Flushed);
        true
    }

    /// Updates the wrapping column together with the full-width char cost;
    /// same no-op and reconstruction behavior as [`Self::set_tab_size`].
    pub fn set_wrapping_column(
        &mut self,
        model: &mut dyn TextModel,
        wrapping_column: Option<usize>,
        columns_for_full_width_char: usize,
        sink: &mut dyn ViewEventSink,
    ) -> bool {
        if self.settings.wrapping_column == wrapping_column
            && self.settings.columns_for_full_width_char == columns_for_full_width_char
        {
            return false;
        }
        self.settings.wrapping_column = wrapping_column;
        self.settings.columns_for_full_width_char = columns_for_full_width_char;
        self.construct_lines(model);
        sink.handle(ViewEvent::Flushed);
        true
    }

    pub fn set_wrapping_indent(
        &mut self,
        model: &mut dyn TextModel,
        wrapping_indent: WrappingIndent,
        sink: &mut dyn ViewEventSink,
    ) -> bool {
        if self.settings.wrapping_indent == wrapping_indent {
            return false;
        }
        self.settings.wrapping_indent = wrapping_indent;
        self.construct_lines(model);
        sink.handle(ViewEvent::Flushed);
        true
    }

    // ---- visibility ------------------------------------------------------

    /// Current hidden ranges, read back from the decoration store, ascending
    /// by start line.
    pub fn hidden_areas(&self, model: &dyn TextModel) -> Vec<TextRange> {
        let mut ranges: Vec<TextRange> = self
            .hidden_area_ids
            .iter()
            .filter_map(|&id| model.decoration_range(id))
            .collect();
        ranges.sort_by_key(|range| range.start_line);
        ranges
    }

    pub fn is_line_visible(&self, line_number: usize) -> bool {
        self.lines[line_number - 1].is_visible()
    }

    /// Replace the set of hidden input-line ranges. Ranges are clamped to
    /// the document, then merged whenever they touch or overlap (hiding is
    /// per whole line; columns are ignored). Returns false without emitting
    /// when the reduced set equals the current one. Refuses, before mutating
    /// anything, a set that would hide every line.
    pub fn set_hidden_areas(
        &mut self,
        model: &mut dyn TextModel,
        ranges: &[TextRange],
        sink: &mut dyn ViewEventSink,
    ) -> Result<bool, ViewError> {
        let reduced = reduce_line_ranges(ranges.iter().map(|&range| model.validate_range(range)));
        let current: Vec<(usize, usize)> = self
            .hidden_areas(model)
            .iter()
            .map(|range| (range.start_line, range.end_line))
            .collect();
        if current == reduced {
            return Ok(false);
        }
        if let [(start, end)] = reduced.as_slice() {
            if *start <= 1 && *end >= self.lines.len() {
                return Err(ViewError::EverythingHidden);
            }
        }

        let decorations: Vec<TextRange> = reduced
            .iter()
            .map(|&(start, end)| TextRange::lines(start, end))
            .collect();
        self.hidden_area_ids = model.delta_decorations(&self.hidden_area_ids, &decorations);

        let mut pending = reduced.iter().copied().peekable();
        for (index, line) in self.lines.iter_mut().enumerate() {
            let line_number = index + 1;
            while pending.next_if(|&(_, end)| end < line_number).is_some() {}
            let hidden = pending
                .peek()
                .is_some_and(|&(start, _)| start <= line_number);
            if line.is_visible() == hidden {
                line.set_visible(!hidden);
                self.prefix_sums.change(index, line.output_line_count());
            }
        }
        debug!(ranges = reduced.len(), "hidden areas replaced");
        sink.handle(ViewEvent::Flushed);
        Ok(true)
    }

    fn is_in_hidden_area(&self, model: &dyn TextModel, position: Position) -> bool {
        self.hidden_area_ids
            .iter()
            .filter_map(|&id| model.decoration_range(id))
            .any(|range| range.contains_position(position))
    }

    // ---- document change sinks -------------------------------------------

    /// Full reconstruction; the document was replaced wholesale.
    pub fn on_model_flushed(
        &mut self,
        model: &mut dyn TextModel,
        version_id: u64,
        sink: &mut dyn ViewEventSink,
    ) {
        if version_id <= self.valid_model_version_id {
            trace!(version_id, "stale flush replay discarded");
            return;
        }
        self.construct_lines(model);
        sink.handle(ViewEvent::Flushed);
    }

    pub fn on_model_lines_deleted(
        &mut self,
        version_id: u64,
        from_line_number: usize,
        to_line_number: usize,
        sink: &mut dyn ViewEventSink,
    ) {
        if version_id <= self.valid_model_version_id {
            trace!(version_id, "stale delete replay discarded");
            return;
        }
        self.valid_model_version_id = version_id;
        debug_assert!(
            from_line_number >= 1
                && from_line_number <= to_line_number
                && to_line_number <= self.lines.len(),
            "delete range {from_line_number}..={to_line_number} vs {} lines",
            self.lines.len()
        );
        let output_from = if from_line_number == 1 {
            1
        } else {
            self.prefix_sums.accumulated(from_line_number - 2) + 1
        };
        let output_to = self.prefix_sums.accumulated(to_line_number - 1);

        self.lines.drain(from_line_number - 1..to_line_number);
        self.prefix_sums
            .remove(from_line_number - 1, to_line_number - from_line_number + 1);

        trace!(from_line_number, to_line_number, "input lines deleted");
        if output_from <= output_to {
            sink.handle(ViewEvent::LinesDeleted {
                from_line_number: output_from,
                to_line_number: output_to,
            });
        }
    }

    /// Inserted lines inherit visibility from the hidden range containing
    /// `(from_line_number, 1)`, so an insertion inside a fold stays folded.
    pub fn on_model_lines_inserted(
        &mut self,
        model: &dyn TextModel,
        version_id: u64,
        from_line_number: usize,
        to_line_number: usize,
        texts: &[String],
        sink: &mut dyn ViewEventSink,
    ) {
        if version_id <= self.valid_model_version_id {
            trace!(version_id, "stale insert replay discarded");
            return;
        }
        self.valid_model_version_id = version_id;
        debug_assert_eq!(
            texts.len(),
            to_line_number - from_line_number + 1,
            "insert payload does not match the line range"
        );
        let hidden = self.is_in_hidden_area(model, Position::new(from_line_number, 1));

        let mut counts = Vec::with_capacity(texts.len());
        let mut inserted = Vec::with_capacity(texts.len());
        let mut total_new_output = 0usize;
        for text in texts {
            let line = create_split_line(self.factory.as_ref(), text, &self.settings, !hidden);
            let count = line.output_line_count();
            total_new_output += count;
            counts.push(count);
            inserted.push(line);
        }
        let index = from_line_number - 1;
        self.lines.splice(index..index, inserted);
        self.prefix_sums.insert(index, &counts);

        let output_from = if from_line_number == 1 {
            1
        } else {
            self.prefix_sums.accumulated(from_line_number - 2) + 1
        };
        trace!(from_line_number, to_line_number, hidden, "input lines inserted");
        if total_new_output > 0 {
            sink.handle(ViewEvent::LinesInserted {
                from_line_number: output_from,
                to_line_number: output_from + total_new_output - 1,
            });
        }
    }

    /// Rebuild one line after a text change, preserving its visibility.
    /// Returns whether the line's output row count changed (and therefore
    /// every following output line shifted).
    pub fn on_model_line_changed(
        &mut self,
        version_id: u64,
        line_number: usize,
        new_text: &str,
        sink: &mut dyn ViewEventSink,
    ) -> bool {
        if version_id <= self.valid_model_version_id {
            trace!(version_id, "stale change replay discarded");
            return false;
        }
        self.valid_model_version_id = version_id;
        let index = line_number - 1;
        let was_visible = self.lines[index].is_visible();
        let old_count = self.lines[index].output_line_count();
        self.lines[index] =
            create_split_line(self.factory.as_ref(), new_text, &self.settings, was_visible);
        let new_count = self.lines[index].output_line_count();

        let output_start = if index == 0 {
            1
        } else {
            self.prefix_sums.accumulated(index - 1) + 1
        };
        self.prefix_sums.change(index, new_count);
        trace!(line_number, old_count, new_count, "input line changed");

        for row in 0..old_count.min(new_count) {
            sink.handle(ViewEvent::LineChanged {
                line_number: output_start + row,
            });
        }
        if new_count > old_count {
            sink.handle(ViewEvent::LinesInserted {
                from_line_number: output_start + old_count,
                to_line_number: output_start + new_count - 1,
            });
            true
        } else if new_count < old_count {
            sink.handle(ViewEvent::LinesDeleted {
                from_line_number: output_start + new_count,
                to_line_number: output_start + old_count - 1,
            });
            true
        } else {
            false
        }
    }

    // ---- queries ---------------------------------------------------------

    pub fn output_line_count(&self, model: &dyn TextModel) -> Result<usize, ViewError> {
        self.check_fresh(model)?;
        Ok(self.prefix_sums.total())
    }

    pub fn output_line_content(
        &self,
        model: &dyn TextModel,
        output_line_number: usize,
    ) -> Result<String, ViewError> {
        self.check_fresh(model)?;
        self.check_output_line(output_line_number)?;
        let (index, row) = self.locate(output_line_number);
        Ok(self.lines[index].output_line_content(model, index + 1, row))
    }

    pub fn output_line_min_column(
        &self,
        model: &dyn TextModel,
        output_line_number: usize,
    ) -> Result<usize, ViewError> {
        self.check_fresh(model)?;
        self.check_output_line(output_line_number)?;
        let (index, row) = self.locate(output_line_number);
        Ok(self.lines[index].output_line_min_column(model, index + 1, row))
    }

    pub fn output_line_max_column(
        &self,
        model: &dyn TextModel,
        output_line_number: usize,
    ) -> Result<usize, ViewError> {
        self.check_fresh(model)?;
        self.check_output_line(output_line_number)?;
        let (index, row) = self.locate(output_line_number);
        Ok(self.lines[index].output_line_max_column(model, index + 1, row))
    }

    pub fn output_line_tokens(
        &self,
        model: &dyn TextModel,
        output_line_number: usize,
        inaccurate: bool,
    ) -> Result<LineTokens, ViewError> {
        self.check_fresh(model)?;
        self.check_output_line(output_line_number)?;
        let (index, row) = self.locate(output_line_number);
        Ok(self.lines[index].output_line_tokens(model, index + 1, row, inaccurate))
    }

    /// Map an output position back to the input document. The resulting
    /// column is clamped into the input line's bounds.
    pub fn convert_output_to_input(
        &self,
        model: &dyn TextModel,
        position: Position,
    ) -> Result<Position, ViewError> {
        self.check_fresh(model)?;
        self.check_output_line(position.line_number)?;
        let (index, row) = self.locate(position.line_number);
        let line_number = index + 1;
        let input_column = self.lines[index].input_column_of_output_position(row, position.column);
        let clamped = input_column
            .max(model.line_min_column(line_number))
            .min(model.line_max_column(line_number));
        Ok(Position::new(line_number, clamped))
    }

    /// Map an input position to its output position. The input line number
    /// clamps into the document; a hidden input line collapses to the end of
    /// the nearest preceding visible line, or to `(1, 1)` when every line
    /// before it is hidden too.
    pub fn convert_input_to_output(
        &self,
        model: &dyn TextModel,
        position: Position,
    ) -> Result<Position, ViewError> {
        self.check_fresh(model)?;
        if self.lines.is_empty() {
            return Ok(Position::new(1, 1));
        }
        let mut index = position.line_number.clamp(1, self.lines.len()) - 1;
        let mut walked_back = false;
        while index > 0 && !self.lines[index].is_visible() {
            index -= 1;
            walked_back = true;
        }
        if index == 0 && !self.lines[index].is_visible() {
            return Ok(Position::new(1, 1));
        }
        let line_number = index + 1;
        let delta_line_number = 1 + if index == 0 {
            0
        } else {
            self.prefix_sums.accumulated(index - 1)
        };
        let input_column = if walked_back {
            model.line_max_column(line_number)
        } else {
            position.column.min(model.line_max_column(line_number))
        };
        Ok(self.lines[index].output_position_of_input_position(delta_line_number, input_column))
    }

    /// Debugging aid: assert the cross-structure invariants. Cheap enough
    /// for test harness use after every operation; not intended for hosts'
    /// hot paths.
    pub fn assert_consistent(&self, model: &dyn TextModel) {
        assert_eq!(
            self.lines.len(),
            model.line_count(),
            "one split line per input line"
        );
        assert_eq!(self.prefix_sums.len(), self.lines.len());
        for (index, line) in self.lines.iter().enumerate() {
            assert_eq!(
                self.prefix_sums.values()[index],
                line.output_line_count(),
                "prefix sums in lockstep at index {index}"
            );
        }
    }

    fn check_fresh(&self, model: &dyn TextModel) -> Result<(), ViewError> {
        let model_version = model.version_id();
        if model_version != self.valid_model_version_id {
            return Err(ViewError::StaleModel {
                model_version,
                reconciled_version: self.valid_model_version_id,
            });
        }
        Ok(())
    }

    fn check_output_line(&self, output_line_number: usize) -> Result<(), ViewError> {
        let max = self.prefix_sums.total();
        if output_line_number < 1 || output_line_number > max {
            return Err(ViewError::OutOfRange {
                what: "output line",
                value: output_line_number,
                max,
            });
        }
        Ok(())
    }

    fn locate(&self, output_line_number: usize) -> (usize, usize) {
        let found = self.prefix_sums.index_of(output_line_number - 1);
        (found.index, found.remainder)
    }
}

/// Sort whole-line intervals and merge any two that touch or overlap into a
/// disjoint ascending list.
fn reduce_line_ranges(ranges: impl IntoIterator<Item = TextRange>) -> Vec<(usize, usize)> {
    let mut intervals: Vec<(usize, usize)> = ranges
        .into_iter()
        .map(|range| (range.start_line, range.end_line))
        .collect();
    intervals.sort_unstable();
    let mut reduced: Vec<(usize, usize)> = Vec::new();
    for (start, end) in intervals {
        match reduced.last_mut() {
            Some(last) if start <= last.1 + 1 => last.1 = last.1.max(end),
            _ => reduced.push((start, end)),
        }
    }
    reduced
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(intervals: &[(usize, usize)]) -> Vec<TextRange> {
        intervals
            .iter()
            .map(|&(start, end)| TextRange::lines(start, end))
            .collect()
    }

    #[test]
    fn reduce_merges_overlapping_and_touching() {
        let reduced = reduce_line_ranges(ranges(&[(4, 6), (1, 2), (3, 3), (10, 12)]));
        assert_eq!(reduced, vec![(1, 6), (10, 12)]);
    }

    #[test]
    fn reduce_keeps_disjoint_ranges_apart() {
        let reduced = reduce_line_ranges(ranges(&[(5, 6), (1, 2)]));
        assert_eq!(reduced, vec![(1, 2), (5, 6)]);
    }

    #[test]
    fn reduce_empty_is_empty() {
        assert!(reduce_line_ranges(ranges(&[])).is_empty());
    }
}
