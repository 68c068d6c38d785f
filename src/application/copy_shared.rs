//! Copy Shared Action
//!
//! Copies the shared folders of one stage into another stage of the same
//! server and environment.

use std::sync::Arc;

use tracing::{debug, info};

use super::failure::{ActionFailure, ExecutionError};
use super::report::ActionReport;
use super::runner::Action;
use crate::domain::entities::{CopyShared, Payload};
use crate::domain::ports::{InstanceRepository, Progress};
use crate::domain::value_objects::Filter;
use crate::error::ShipyardResult;
use crate::infrastructure::command_builder::CommandBuilder;

#[derive(Debug, Clone)]
pub struct CopySharedRequest {
    pub target: Filter,
    pub source_stage: String,
}

pub struct CopySharedAction {
    repository: Arc<dyn InstanceRepository>,
    shared_folders: Vec<String>,
    commands: CommandBuilder,
}

impl CopySharedAction {
    pub fn new(repository: Arc<dyn InstanceRepository>, shared_folders: Vec<String>) -> Self {
        Self {
            repository,
            shared_folders,
            commands: CommandBuilder,
        }
    }

    fn copy(&self, copy: &CopyShared, progress: &Progress<'_>) -> Result<(), ExecutionError> {
        let connection = copy.source.connection();

        for name in &self.shared_folders {
            let source = copy.source.shared_path().join(name);
            let target = copy.target.shared_path().join(name);

            if !connection.check_folder_exists(&source)? {
                debug!(folder = %source.display(), "shared folder missing at source");
                progress.notice(format!("skipping {}: not present at source", name));
                continue;
            }

            progress.notice(format!("copying folder {}", name));
            connection
                .run(&self.commands.create_folder(&target), None)?
                .into_result()?;
            connection
                .run(&self.commands.copy_recursive(&source.join("."), &target), None)?
                .into_result()?;
        }

        info!(source = %copy.source, target = %copy.target, "shared folders copied");
        Ok(())
    }
}

impl Action for CopySharedAction {
    type Request = CopySharedRequest;

    fn name(&self) -> &'static str {
        "copy-shared"
    }

    fn create_many(
        &self,
        request: &CopySharedRequest,
        report: &mut ActionReport,
    ) -> ShipyardResult<Vec<Payload>> {
        let targets = self.repository.find(&request.target)?;
        if targets.is_empty() {
            report.record_failure(
                format!("copy shared to {}", request.target),
                ActionFailure::SelectionEmpty {
                    reason: format!("no instances match {}", request.target),
                },
            );
        }

        let mut payloads = Vec::new();
        for target in targets {
            let source_filter = Filter::exact(
                target.server_name(),
                target.environment_name(),
                &request.source_stage,
            );
            match self.repository.find(&source_filter)?.into_iter().next() {
                Some(source) => payloads.push(Payload::CopyShared(CopyShared { source, target })),
                None => report.record_failure(
                    format!("copy shared to {}", target),
                    ActionFailure::SelectionEmpty {
                        reason: format!(
                            "no source instance at stage {} for {}",
                            request.source_stage, target
                        ),
                    },
                ),
            }
        }
        Ok(payloads)
    }

    fn can_process_payload(&self, payload: &Payload) -> Result<(), String> {
        let copy = match payload {
            Payload::CopyShared(copy) => copy,
            other => return Err(format!("expected a copy-shared payload, got {}", other.kind())),
        };

        if copy.source == copy.target {
            return Err(format!(
                "cannot copy shared data of {} onto itself",
                copy.source
            ));
        }

        if !copy
            .source
            .connection()
            .same_machine(copy.target.connection().as_ref())
        {
            return Err(format!(
                "{} ({}) and {} ({}) are on different machines",
                copy.source,
                copy.source.connection().endpoint(),
                copy.target,
                copy.target.connection().endpoint()
            ));
        }

        Ok(())
    }

    fn do_execute(
        &self,
        payload: &mut Payload,
        progress: &Progress<'_>,
    ) -> Result<(), ActionFailure> {
        match payload {
            Payload::CopyShared(copy) => Ok(self.copy(copy, progress)?),
            other => Err(ExecutionError::UnsupportedPayload {
                description: other.describe(),
            }
            .into()),
        }
    }
}
