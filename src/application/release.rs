//! Release Action
//!
//! Builds a release on the build connection and publishes the archive.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use super::failure::{ActionFailure, ExecutionError};
use super::report::ActionReport;
use super::runner::Action;
use crate::domain::entities::{Payload, Release, Task};
use crate::domain::ports::{Connection, Progress, ReleaseStore};
use crate::error::ShipyardResult;
use crate::infrastructure::command_builder::CommandBuilder;

/// Checks out, builds and packages a release
#[derive(Debug)]
pub struct ReleaseBuilder {
    connection: Arc<dyn Connection>,
    repository: String,
    build_path: PathBuf,
    task: Task,
    commands: CommandBuilder,
}

impl ReleaseBuilder {
    pub fn new(
        connection: Arc<dyn Connection>,
        repository: impl Into<String>,
        build_path: impl Into<PathBuf>,
        task: Task,
    ) -> Self {
        Self {
            connection,
            repository: repository.into(),
            build_path: build_path.into(),
            task,
            commands: CommandBuilder,
        }
    }

    pub fn build_path(&self) -> &PathBuf {
        &self.build_path
    }

    /// Build `release` and return the packaged archive
    pub fn build(&self, release: &Release, progress: &Progress<'_>) -> Result<Vec<u8>, ExecutionError> {
        let connection = self.connection.as_ref();
        let archive_name = release.archive_name();

        connection
            .run(&self.commands.remove_recursive(&self.build_path), None)?
            .into_result()?;

        progress.notice(format!("checking out {} at {}", self.repository, release.commitish()));
        connection
            .run(
                &self.commands.shallow_checkout(
                    &self.repository,
                    release.commitish(),
                    &self.build_path,
                ),
                None,
            )?
            .into_result()?;

        progress.notice(format!("running task {}", self.task.name()));
        connection.execute_task(&self.build_task())?;

        progress.notice(format!("packaging {}", archive_name));
        connection
            .run(
                &self.commands.compress_tar_gz(&self.build_path, &archive_name),
                None,
            )?
            .into_result()?;
        let archive = connection.read_file(&self.build_path.join(&archive_name))?;

        connection
            .run(&self.commands.remove_recursive(&self.build_path), None)?
            .into_result()?;

        info!(release = %release, bytes = archive.len(), "release built");
        Ok(archive)
    }

    /// The configured task, run inside the checkout
    fn build_task(&self) -> Task {
        let folder = match self.task.working_folder() {
            Some(folder) if folder.is_absolute() => folder.to_path_buf(),
            Some(folder) => self.build_path.join(folder),
            None => self.build_path.clone(),
        };
        self.task.clone().with_working_folder(folder)
    }
}

pub struct ReleaseAction {
    builder: ReleaseBuilder,
    store: Arc<dyn ReleaseStore>,
}

impl ReleaseAction {
    pub fn new(builder: ReleaseBuilder, store: Arc<dyn ReleaseStore>) -> Self {
        Self { builder, store }
    }
}

impl Action for ReleaseAction {
    type Request = Release;

    fn name(&self) -> &'static str {
        "release"
    }

    fn create_many(
        &self,
        request: &Release,
        report: &mut ActionReport,
    ) -> ShipyardResult<Vec<Payload>> {
        if request.commitish().trim().is_empty() {
            report.record_failure(
                "build",
                ActionFailure::SelectionEmpty {
                    reason: "no commitish given".to_string(),
                },
            );
            return Ok(Vec::new());
        }
        Ok(vec![Payload::Release(request.clone())])
    }

    fn can_process_payload(&self, payload: &Payload) -> Result<(), String> {
        match payload {
            Payload::Release(_) => Ok(()),
            other => Err(format!("expected a release payload, got {}", other.kind())),
        }
    }

    fn do_execute(
        &self,
        payload: &mut Payload,
        progress: &Progress<'_>,
    ) -> Result<(), ActionFailure> {
        let release = match payload {
            Payload::Release(release) => release,
            other => {
                return Err(ExecutionError::UnsupportedPayload {
                    description: other.describe(),
                }
                .into())
            }
        };

        let archive = self.builder.build(release, progress)?;
        self.store
            .publish(release, &release.archive_name(), &archive)
            .map_err(ExecutionError::from)?;
        progress.notice(format!("published {}", release.archive_name()));
        Ok(())
    }
}
