//! View-model line layer: projects a versioned line document to the
//! sequence of output (view) lines a renderer draws.
//!
//! Two projections compose: soft wrapping (one input line becomes several
//! output rows, continuations carrying a visual indent) and hiding
//! (caller-marked input ranges contribute zero output rows). The layer owns
//! the bidirectional (input line, column) to (output line, column) mapping,
//! answers output-line queries in O(log N), and emits incremental
//! [`ViewEvent`]s as the document mutates.
//!
//! Execution model: single-threaded, cooperative, run-to-completion. Every
//! public call either completes with invariants intact or fails before
//! mutating observable state. Change events must arrive in strictly
//! increasing version order; replays are discarded.
//!
//! The document itself, the tokenizer, the decoration engine and the
//! line-break algorithm stay outside, consumed through [`TextModel`] and
//! `view_wrap::LineMapperFactory`.

mod error;
mod event;
mod model;
mod split_line;
mod view_lines;

pub use error::ViewError;
pub use event::{DiscardEvents, EventCollector, ViewEvent, ViewEventSink};
pub use model::{DecorationId, TextModel};
pub use split_line::SplitLine;
pub use view_lines::ViewLines;
