//! JSON Event Sink
//!
//! Outputs action events as NDJSON for CI/automation consumption.

use crate::domain::ports::{ActionEvent, ActionEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// JSON representation of one event
pub fn event_to_json(event: &ActionEvent) -> serde_json::Value {
    match event {
        ActionEvent::Started {
            action,
            payload_count,
        } => serde_json::json!({
            "event": "start",
            "action": action,
            "payload_count": payload_count,
        }),

        ActionEvent::Rejected {
            description,
            reason,
        } => serde_json::json!({
            "event": "rejected",
            "description": description,
            "reason": reason,
        }),

        ActionEvent::PayloadStarted { index, description } => serde_json::json!({
            "event": "item_start",
            "index": index,
            "description": description,
        }),

        ActionEvent::Progress { index, message } => serde_json::json!({
            "event": "progress",
            "index": index,
            "message": message,
        }),

        ActionEvent::PayloadSucceeded { index, description } => serde_json::json!({
            "event": "item_done",
            "index": index,
            "description": description,
        }),

        ActionEvent::PayloadFailed {
            index,
            description,
            kind,
            reason,
        } => serde_json::json!({
            "event": "item_failed",
            "index": index,
            "description": description,
            "kind": kind,
            "reason": reason,
        }),

        ActionEvent::Completed {
            action,
            succeeded,
            failed,
        } => serde_json::json!({
            "event": "complete",
            "action": action,
            "succeeded": succeeded,
            "failed": failed,
        }),
    }
}

impl ActionEventSink for JsonEventSink {
    fn on_event(&self, event: ActionEvent) {
        self.write_event(event_to_json(&event));
    }
}
