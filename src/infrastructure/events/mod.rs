//! Event Sink Implementations
//!
//! Provides concrete implementations of ActionEventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//! - TracingEventSink: log lines through `tracing`

mod json;
mod log;

pub use json::{event_to_json, JsonEventSink};
pub use log::TracingEventSink;
