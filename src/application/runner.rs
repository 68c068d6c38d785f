//! Action pipeline
//!
//! Every action expands a request into payloads, then each payload is
//! checked structurally, gated by the policy engine and executed. A failing
//! payload is recorded and the run moves on to the next one.

use std::sync::Arc;

use tracing::{info, info_span, warn};

use super::failure::ActionFailure;
use super::report::ActionReport;
use crate::domain::entities::Payload;
use crate::domain::policies::PolicyEngine;
use crate::domain::ports::{ActionEvent, ActionEventSink, NoopEventSink, Progress};
use crate::error::ShipyardResult;

/// One kind of operation over payloads
pub trait Action {
    type Request;

    fn name(&self) -> &'static str;

    /// Expand a request into payloads.
    ///
    /// Targets that cannot become a payload are recorded as failures in
    /// `report`. Errors returned here abort the whole run.
    fn create_many(
        &self,
        request: &Self::Request,
        report: &mut ActionReport,
    ) -> ShipyardResult<Vec<Payload>>;

    /// Structural precondition, checked before any policy
    fn can_process_payload(&self, payload: &Payload) -> Result<(), String>;

    /// Run the side effects. Execution errors arrive as
    /// [`ActionFailure::ExecutionFailed`]; an action that gates a nested
    /// step on policy reports [`ActionFailure::PolicyDenied`].
    fn do_execute(
        &self,
        payload: &mut Payload,
        progress: &Progress<'_>,
    ) -> Result<(), ActionFailure>;
}

/// Drives actions through the payload pipeline
pub struct ActionRunner {
    policies: PolicyEngine,
    events: Arc<dyn ActionEventSink>,
}

impl ActionRunner {
    pub fn new(policies: PolicyEngine) -> Self {
        Self {
            policies,
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn ActionEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn policies(&self) -> &PolicyEngine {
        &self.policies
    }

    pub fn run<A: Action>(&self, action: &A, request: &A::Request) -> ShipyardResult<ActionReport> {
        let span = info_span!("action", name = action.name());
        let _guard = span.enter();

        let mut report = ActionReport::new(action.name());
        let mut payloads = action.create_many(request, &mut report)?;

        for (description, failure) in report.failures() {
            self.events.on_event(ActionEvent::Rejected {
                description: description.to_string(),
                reason: failure.to_string(),
            });
        }

        self.events.on_event(ActionEvent::Started {
            action: action.name(),
            payload_count: payloads.len(),
        });
        info!(payloads = payloads.len(), "payloads created");

        for (index, payload) in payloads.iter_mut().enumerate() {
            let description = payload.describe();
            self.events.on_event(ActionEvent::PayloadStarted {
                index,
                description: description.clone(),
            });

            match self.process(action, payload, index) {
                Ok(()) => {
                    info!(payload = %description, "payload succeeded");
                    self.events.on_event(ActionEvent::PayloadSucceeded {
                        index,
                        description: description.clone(),
                    });
                    report.record_success(description);
                }
                Err(failure) => {
                    warn!(payload = %description, kind = failure.kind(), error = %failure, "payload failed");
                    self.events.on_event(ActionEvent::PayloadFailed {
                        index,
                        description: description.clone(),
                        kind: failure.kind(),
                        reason: failure.to_string(),
                    });
                    report.record_failure(description, failure);
                }
            }
        }

        self.events.on_event(ActionEvent::Completed {
            action: action.name(),
            succeeded: report.succeeded(),
            failed: report.failed(),
        });
        Ok(report)
    }

    fn process<A: Action>(
        &self,
        action: &A,
        payload: &mut Payload,
        index: usize,
    ) -> Result<(), ActionFailure> {
        action
            .can_process_payload(payload)
            .map_err(|reason| ActionFailure::PayloadInvalid { reason })?;

        self.policies.can_execute(payload)?;

        let progress = Progress::new(self.events.as_ref(), index);
        action.do_execute(payload, &progress)
    }
}
