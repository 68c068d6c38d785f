//! Action Event Port
//!
//! Provides an observable interface for action runs.
//! Enables progress reporting, JSON event streams, and debugging.

/// Event emitted while an action processes its payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEvent {
    /// Payloads were created and processing starts
    Started {
        action: &'static str,
        payload_count: usize,
    },

    /// A requested target could not be turned into a payload
    Rejected { description: String, reason: String },

    /// Processing of one payload started
    PayloadStarted { index: usize, description: String },

    /// Intermediate progress of a payload
    Progress { index: usize, message: String },

    /// Payload executed successfully
    PayloadSucceeded { index: usize, description: String },

    /// Payload was skipped or failed
    PayloadFailed {
        index: usize,
        description: String,
        kind: &'static str,
        reason: String,
    },

    /// Action finished
    Completed {
        action: &'static str,
        succeeded: usize,
        failed: usize,
    },
}

/// Trait for receiving action events
///
/// Implementations can be:
/// - TracingEventSink: structured log lines
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait ActionEventSink: Send + Sync {
    /// Handle an action event
    fn on_event(&self, event: ActionEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl ActionEventSink for NoopEventSink {
    fn on_event(&self, _event: ActionEvent) {}
}

/// Progress reporter handed to a payload while it executes
pub struct Progress<'a> {
    sink: &'a dyn ActionEventSink,
    index: usize,
}

impl<'a> Progress<'a> {
    pub fn new(sink: &'a dyn ActionEventSink, index: usize) -> Self {
        Self { sink, index }
    }

    pub fn notice(&self, message: impl Into<String>) {
        self.sink.on_event(ActionEvent::Progress {
            index: self.index,
            message: message.into(),
        });
    }
}
