//! Rollback Action
//!
//! Re-activates an older installation without removing anything.

use std::sync::Arc;

use tracing::info;

use super::activation::switch_current;
use super::failure::{ActionFailure, ExecutionError};
use super::report::ActionReport;
use super::runner::Action;
use crate::domain::entities::{Payload, Rollback};
use crate::domain::ports::{InstanceRepository, Progress};
use crate::domain::value_objects::Filter;
use crate::error::ShipyardResult;
use crate::infrastructure::command_builder::CommandBuilder;

#[derive(Debug, Clone)]
pub struct RollbackRequest {
    pub target: Filter,
    /// Release to return to; the previous installation when absent
    pub rollback_to: Option<String>,
    /// Release expected to be active right now
    pub rollback_from: Option<String>,
}

pub struct RollbackAction {
    repository: Arc<dyn InstanceRepository>,
    commands: CommandBuilder,
}

impl RollbackAction {
    pub fn new(repository: Arc<dyn InstanceRepository>) -> Self {
        Self {
            repository,
            commands: CommandBuilder,
        }
    }

    fn activate(&self, rollback: &mut Rollback, progress: &Progress<'_>) -> Result<(), ExecutionError> {
        let number = rollback.installation.number();
        let target = &mut rollback.target;

        let folder = target.installation_path(number);
        if !target.connection().check_folder_exists(&folder)? {
            return Err(ExecutionError::NotConfirmed { path: folder });
        }

        progress.notice(format!("activating installation #{}", number));
        switch_current(self.repository.as_ref(), &self.commands, target, number)?;
        target.set_current(number)?;

        info!(instance = %target, number, release = %rollback.installation.release(), "rolled back");
        Ok(())
    }
}

impl Action for RollbackAction {
    type Request = RollbackRequest;

    fn name(&self) -> &'static str {
        "rollback"
    }

    fn create_many(
        &self,
        request: &RollbackRequest,
        report: &mut ActionReport,
    ) -> ShipyardResult<Vec<Payload>> {
        let instances = self.repository.find(&request.target)?;
        if instances.is_empty() {
            report.record_failure(
                format!("rollback {}", request.target),
                ActionFailure::SelectionEmpty {
                    reason: format!("no instances match {}", request.target),
                },
            );
        }

        let mut payloads = Vec::new();
        for target in instances {
            let installation = target
                .rollback_target(
                    request.rollback_to.as_deref(),
                    request.rollback_from.as_deref(),
                )
                .cloned();
            match installation {
                Some(installation) => payloads.push(Payload::Rollback(Rollback {
                    target,
                    installation,
                })),
                None => report.record_failure(
                    format!("rollback {}", target),
                    ActionFailure::SelectionEmpty {
                        reason: format!("no installation to roll back to on {}", target),
                    },
                ),
            }
        }
        Ok(payloads)
    }

    fn can_process_payload(&self, payload: &Payload) -> Result<(), String> {
        match payload {
            Payload::Rollback(_) => Ok(()),
            other => Err(format!("expected a rollback payload, got {}", other.kind())),
        }
    }

    fn do_execute(
        &self,
        payload: &mut Payload,
        progress: &Progress<'_>,
    ) -> Result<(), ActionFailure> {
        match payload {
            Payload::Rollback(rollback) => Ok(self.activate(rollback, progress)?),
            other => Err(ExecutionError::UnsupportedPayload {
                description: other.describe(),
            }
            .into()),
        }
    }
}
