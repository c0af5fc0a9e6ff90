//! Shared fixtures: an in-memory `TextModel` with anchoring decorations,
//! deterministic wrap factories and a tracing bootstrap.

#![allow(dead_code)]

use std::collections::HashMap;

use view_lines::{DecorationId, TextModel};
use view_text::{LineTokens, TextRange};
use view_wrap::{LineMapperFactory, LineMapping, WrapSettings, WrappedLineMapping};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Line-array document with a version counter and decorations that shift
/// under edits the way a host marker engine would.
pub struct InMemoryModel {
    lines: Vec<String>,
    version: u64,
    decorations: HashMap<u64, TextRange>,
    next_decoration: u64,
}

impl InMemoryModel {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            version: 1,
            decorations: HashMap::new(),
            next_decoration: 0,
        }
    }

    /// Advance the version without an edit; simulates a host that forgot to
    /// deliver a change event.
    pub fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Insert `texts` so the first lands at 1-based position `at`.
    pub fn insert_lines(&mut self, at: usize, texts: &[&str]) {
        assert!(at >= 1 && at <= self.lines.len() + 1);
        self.version += 1;
        let n = texts.len();
        for range in self.decorations.values_mut() {
            if range.start_line >= at {
                range.start_line += n;
            }
            if range.end_line >= at {
                range.end_line += n;
            }
        }
        self.lines
            .splice(at - 1..at - 1, texts.iter().map(|s| s.to_string()));
    }

    /// Delete lines `from..=to` (1-based, inclusive).
    pub fn delete_lines(&mut self, from: usize, to: usize) {
        assert!(from >= 1 && from <= to && to <= self.lines.len());
        self.version += 1;
        let n = to - from + 1;
        self.decorations.retain(|_, range| {
            if range.start_line >= from && range.end_line <= to {
                return false;
            }
            if range.start_line > to {
                range.start_line -= n;
            } else if range.start_line >= from {
                range.start_line = from;
            }
            if range.end_line > to {
                range.end_line -= n;
            } else if range.end_line >= from {
                range.end_line = from - 1;
            }
            true
        });
        self.lines.drain(from - 1..to);
    }

    pub fn change_line(&mut self, line_number: usize, text: &str) {
        self.version += 1;
        self.lines[line_number - 1] = text.to_string();
    }

    pub fn replace_all(&mut self, lines: &[&str]) {
        self.version += 1;
        self.lines = lines.iter().map(|s| s.to_string()).collect();
        self.decorations.clear();
    }
}

impl TextModel for InMemoryModel {
    fn version_id(&self) -> u64 {
        self.version
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn lines_content(&self) -> Vec<String> {
        self.lines.clone()
    }

    fn line_content(&self, line_number: usize) -> String {
        self.lines[line_number - 1].clone()
    }

    fn line_min_column(&self, _line_number: usize) -> usize {
        1
    }

    fn line_max_column(&self, line_number: usize) -> usize {
        self.lines[line_number - 1].len() + 1
    }

    fn line_tokens(&self, line_number: usize, _inaccurate: bool) -> LineTokens {
        LineTokens::empty(self.lines[line_number - 1].len())
    }

    fn validate_range(&self, range: TextRange) -> TextRange {
        let line_count = self.lines.len().max(1);
        let start_line = range.start_line.clamp(1, line_count);
        let end_line = range.end_line.clamp(start_line, line_count);
        TextRange::new(
            start_line,
            range.start_column.clamp(1, self.line_max_column(start_line)),
            end_line,
            range.end_column.clamp(1, self.line_max_column(end_line)),
        )
    }

    fn decoration_range(&self, id: DecorationId) -> Option<TextRange> {
        self.decorations.get(&id.0).copied()
    }

    fn delta_decorations(
        &mut self,
        old_ids: &[DecorationId],
        new_ranges: &[TextRange],
    ) -> Vec<DecorationId> {
        for id in old_ids {
            self.decorations.remove(&id.0);
        }
        new_ranges
            .iter()
            .map(|&range| {
                let id = self.next_decoration;
                self.next_decoration += 1;
                self.decorations.insert(id, range);
                DecorationId(id)
            })
            .collect()
    }
}

/// Never wraps anything.
pub struct NoWrap;

impl LineMapperFactory for NoWrap {
    fn create_line_mapping(
        &self,
        _text: &str,
        _settings: &WrapSettings,
    ) -> Option<Box<dyn LineMapping>> {
        None
    }
}

/// Hard byte chunking at the wrapping column with a fixed indent, ignoring
/// visual widths. Deterministic, so scenario expectations stay exact.
pub struct FixedWrap {
    pub indent: &'static str,
}

impl FixedWrap {
    pub fn plain() -> Self {
        Self { indent: "" }
    }
}

impl LineMapperFactory for FixedWrap {
    fn create_line_mapping(
        &self,
        text: &str,
        settings: &WrapSettings,
    ) -> Option<Box<dyn LineMapping>> {
        let column = settings.wrapping_column?;
        if column == 0 || text.len() <= column {
            return None;
        }
        let mut lengths = Vec::new();
        let mut remaining = text.len();
        while remaining > column {
            lengths.push(column);
            remaining -= column;
        }
        if remaining > 0 {
            lengths.push(remaining);
        }
        Some(Box::new(WrappedLineMapping::new(
            lengths,
            self.indent.to_string(),
        )))
    }
}

/// Expected row count under [`FixedWrap`] for mirror bookkeeping.
pub fn fixed_wrap_rows(text: &str, wrapping_column: Option<usize>) -> usize {
    match wrapping_column {
        Some(column) if column > 0 && text.len() > column => text.len().div_ceil(column),
        _ => 1,
    }
}

/// Expected content of one output row under [`FixedWrap`].
pub fn fixed_wrap_row_content(
    text: &str,
    wrapping_column: Option<usize>,
    indent: &str,
    row: usize,
) -> String {
    let rows = fixed_wrap_rows(text, wrapping_column);
    assert!(row < rows);
    if rows == 1 {
        return text.to_string();
    }
    let column = wrapping_column.unwrap();
    let start = row * column;
    let end = ((row + 1) * column).min(text.len());
    if row == 0 {
        text[start..end].to_string()
    } else {
        format!("{indent}{}", &text[start..end])
    }
}
