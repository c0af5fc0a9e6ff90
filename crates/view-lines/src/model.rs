//! The document contract this layer projects from.
//!
//! The buffer, tokenizer and decoration engine live in the host; the
//! projection only ever sees them through [`TextModel`]. The model's version
//! id is the freshness token: every query against the projection is checked
//! against the version it was last reconciled to.

use view_text::{LineTokens, TextRange};

/// Opaque handle to one decoration in the host's marker engine. The host
/// guarantees a decoration's range tracks document edits until the handle is
/// released through [`TextModel::delta_decorations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecorationId(pub u64);

/// Read access to a versioned line document plus batched decoration upkeep.
///
/// Line numbers are 1-based. `line_min_column` is 1 for ordinary buffers;
/// `line_max_column` is the line's byte length plus 1.
pub trait TextModel {
    /// Monotonically increasing mutation counter.
    fn version_id(&self) -> u64;

    fn line_count(&self) -> usize;

    /// All line contents, in order, without line terminators.
    fn lines_content(&self) -> Vec<String>;

    fn line_content(&self, line_number: usize) -> String;

    fn line_min_column(&self, line_number: usize) -> usize;

    fn line_max_column(&self, line_number: usize) -> usize;

    /// Tokens for one line. With `inaccurate` the model may serve stale
    /// tokenization instead of forcing the tokenizer to catch up.
    fn line_tokens(&self, line_number: usize, inaccurate: bool) -> LineTokens;

    /// Clamp a range into the document's current bounds.
    fn validate_range(&self, range: TextRange) -> TextRange;

    /// Current position of a decoration, `None` once it was released or
    /// collapsed away by edits.
    fn decoration_range(&self, id: DecorationId) -> Option<TextRange>;

    /// Atomically release `old_ids` and install decorations for
    /// `new_ranges`, returning the new handles in range order.
    fn delta_decorations(
        &mut self,
        old_ids: &[DecorationId],
        new_ranges: &[TextRange],
    ) -> Vec<DecorationId>;
}
