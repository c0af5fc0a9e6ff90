//! Coarse view events emitted towards the renderer.
//!
//! Events fire synchronously inside the call that caused them, after all
//! internal state is consistent. Within one `on_model_line_changed` call the
//! order is fixed: `LineChanged` events first, then at most one
//! `LinesInserted` or `LinesDeleted`. Config changes and visibility changes
//! emit a single `Flushed`.
//!
//! All line numbers in event payloads are 1-based output (view) line
//! numbers, inclusive on both ends.

/// What the downstream view needs to invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// Total invalidation; every cached output line is stale.
    Flushed,
    /// One output line's content changed in place.
    LineChanged { line_number: usize },
    /// New output lines appeared; lines at and after `from_line_number`
    /// shifted down.
    LinesInserted {
        from_line_number: usize,
        to_line_number: usize,
    },
    /// Output lines disappeared; lines after `to_line_number` shifted up.
    LinesDeleted {
        from_line_number: usize,
        to_line_number: usize,
    },
}

/// Receiver for view events, passed into every mutating call.
pub trait ViewEventSink {
    fn handle(&mut self, event: ViewEvent);
}

impl<F: FnMut(ViewEvent)> ViewEventSink for F {
    fn handle(&mut self, event: ViewEvent) {
        self(event)
    }
}

/// Discards everything; for callers that drive the projection without a
/// renderer attached.
#[derive(Debug, Default)]
pub struct DiscardEvents;

impl ViewEventSink for DiscardEvents {
    fn handle(&mut self, _event: ViewEvent) {}
}

/// Buffers events for later inspection or batched dispatch.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<ViewEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }
}

impl ViewEventSink for EventCollector {
    fn handle(&mut self, event: ViewEvent) {
        self.events.push(event);
    }
}
