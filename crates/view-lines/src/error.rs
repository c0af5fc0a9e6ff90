//! Failures surfaced to the host.
//!
//! All errors are synchronous and leave the projection unmutated; nothing is
//! recovered internally, since a silent fallback would desynchronize the
//! prefix sums from the per-line state. Hidden-line access through
//! [`crate::SplitLine`] directly is a programming error and panics instead;
//! the collection's own API never reaches a hidden line.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The model moved on without delivering its change events. The host
    /// must flush (or deliver the pending events) and retry.
    #[error(
        "model is at version {model_version} but the view was reconciled to {reconciled_version}"
    )]
    StaleModel {
        model_version: u64,
        reconciled_version: u64,
    },

    /// A line number outside the current projection bounds, in a query that
    /// does not clamp.
    #[error("{what} {value} outside 1..={max}")]
    OutOfRange {
        what: &'static str,
        value: usize,
        max: usize,
    },

    /// Hidden areas must leave at least one input line visible.
    #[error("hidden areas would cover every line of the document")]
    EverythingHidden,
}
