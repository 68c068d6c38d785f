//! Tracing Event Sink
//!
//! Turns action events into log lines for interactive use.

use tracing::{info, warn};

use crate::domain::ports::{ActionEvent, ActionEventSink};

#[derive(Debug, Default)]
pub struct TracingEventSink;

impl ActionEventSink for TracingEventSink {
    fn on_event(&self, event: ActionEvent) {
        match event {
            ActionEvent::Started {
                action,
                payload_count,
            } => info!(action, payload_count, "action started"),
            ActionEvent::Rejected {
                description,
                reason,
            } => warn!(%description, %reason, "target rejected"),
            ActionEvent::PayloadStarted { index, description } => {
                info!(index, %description, "payload started")
            }
            ActionEvent::Progress { index, message } => info!(index, %message),
            ActionEvent::PayloadSucceeded { index, description } => {
                info!(index, %description, "payload succeeded")
            }
            ActionEvent::PayloadFailed {
                index,
                description,
                kind,
                reason,
            } => warn!(index, %description, kind, %reason, "payload failed"),
            ActionEvent::Completed {
                action,
                succeeded,
                failed,
            } => info!(action, succeeded, failed, "action completed"),
        }
    }
}
