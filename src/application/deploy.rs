//! Deploy Action
//!
//! Installs a release onto every instance matched by a filter:
//! 1. Fetch the archive from the store (or build and publish it, when the
//!    build policies allow the release)
//! 2. Extract it into a fresh installation folder
//! 3. Link shared folders and run the deploy task
//! 4. Record and confirm the installation
//! 5. Switch `current` and prune old installations

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::activation::switch_current;
use super::failure::{ActionFailure, ExecutionError};
use super::release::ReleaseBuilder;
use super::report::ActionReport;
use super::runner::Action;
use crate::domain::entities::{Deploy, Installation, Payload, Release, Task};
use crate::domain::policies::PolicyEngine;
use crate::domain::ports::{InstanceRepository, Progress, ReleaseStore};
use crate::domain::value_objects::Filter;
use crate::error::ShipyardResult;
use crate::infrastructure::command_builder::CommandBuilder;

#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub release: Release,
    pub target: Filter,
}

pub struct DeployAction {
    repository: Arc<dyn InstanceRepository>,
    store: Arc<dyn ReleaseStore>,
    builder: Option<ReleaseBuilder>,
    build_policies: PolicyEngine,
    shared_folders: Vec<String>,
    deploy_task: Option<Task>,
    commands: CommandBuilder,
}

impl DeployAction {
    pub fn new(repository: Arc<dyn InstanceRepository>, store: Arc<dyn ReleaseStore>) -> Self {
        Self {
            repository,
            store,
            builder: None,
            build_policies: PolicyEngine::default(),
            shared_folders: Vec::new(),
            deploy_task: None,
            commands: CommandBuilder,
        }
    }

    /// Build releases that are not in the store yet, once `policies`
    /// accept the release payload
    pub fn with_builder(mut self, builder: ReleaseBuilder, policies: PolicyEngine) -> Self {
        self.builder = Some(builder);
        self.build_policies = policies;
        self
    }

    pub fn with_shared_folders(mut self, shared_folders: Vec<String>) -> Self {
        self.shared_folders = shared_folders;
        self
    }

    /// Task run inside each new installation before it is activated
    pub fn with_deploy_task(mut self, task: Task) -> Self {
        self.deploy_task = Some(task);
        self
    }

    fn archive(&self, release: &Release, progress: &Progress<'_>) -> Result<Vec<u8>, ActionFailure> {
        if let Some(archive) = self.store.fetch(release).map_err(ExecutionError::from)? {
            debug!(release = %release, "archive found in store");
            return Ok(archive);
        }

        let Some(builder) = &self.builder else {
            return Err(ExecutionError::ArchiveMissing {
                release: release.name().to_string(),
            }
            .into());
        };

        self.build_policies
            .can_execute(&Payload::Release(release.clone()))?;

        progress.notice(format!("{} not published yet, building it", release));
        let archive = builder.build(release, progress)?;
        self.store
            .publish(release, &release.archive_name(), &archive)
            .map_err(ExecutionError::from)?;
        Ok(archive)
    }

    fn install(
        &self,
        deploy: &mut Deploy,
        archive: Vec<u8>,
        progress: &Progress<'_>,
    ) -> Result<(), ExecutionError> {
        let target = &mut deploy.target;
        let connection = Arc::clone(target.connection());

        // skip numbers left behind by interrupted runs
        let mut number = target.next_installation_number();
        while connection.check_folder_exists(&target.installation_path(number))? {
            number += 1;
        }
        let folder = target.installation_path(number);

        progress.notice(format!("installing {} as #{}", deploy.release, number));
        connection
            .run(&self.commands.create_folder(&folder), None)?
            .into_result()?;
        let archive_path = folder.join(deploy.release.archive_name());
        connection.write_file(&archive_path, &archive)?;
        connection
            .run(&self.commands.uncompress_tar_gz(&archive_path, &folder), None)?
            .into_result()?;
        connection
            .run(&self.commands.remove_recursive(&archive_path), None)?
            .into_result()?;

        for name in &self.shared_folders {
            let shared = target.shared_path().join(name);
            let link = folder.join(name);
            connection
                .run(&self.commands.create_folder(&shared), None)?
                .into_result()?;
            connection
                .run(&self.commands.remove_recursive(&link), None)?
                .into_result()?;
            connection
                .run(&self.commands.create_symlink(&link, &shared), None)?
                .into_result()?;
        }

        if let Some(task) = &self.deploy_task {
            progress.notice(format!("running task {}", task.name()));
            connection.execute_task(&task.clone().with_working_folder(&folder))?;
        }

        let installation = Installation::new(number, deploy.release.clone(), Utc::now());
        self.repository.record_installation(target, &installation)?;
        if !self.repository.is_recorded(target, number)? {
            return Err(ExecutionError::NotConfirmed { path: folder });
        }

        switch_current(self.repository.as_ref(), &self.commands, target, number)?;
        target.add_installation(installation)?;
        target.set_current(number)?;
        progress.notice(format!("{} is now active on {}", deploy.release, target));

        for old in target.installations_to_prune() {
            debug!(instance = %target, number = old, "pruning installation");
            connection
                .run(
                    &self.commands.remove_recursive(&target.installation_path(old)),
                    None,
                )?
                .into_result()?;
            target.remove_installation(old)?;
        }

        info!(instance = %target, release = %deploy.release, number, "release deployed");
        Ok(())
    }
}

impl Action for DeployAction {
    type Request = DeployRequest;

    fn name(&self) -> &'static str {
        "deploy"
    }

    fn create_many(
        &self,
        request: &DeployRequest,
        report: &mut ActionReport,
    ) -> ShipyardResult<Vec<Payload>> {
        let instances = self.repository.find(&request.target)?;
        if instances.is_empty() {
            report.record_failure(
                format!("deploy {} to {}", request.release, request.target),
                ActionFailure::SelectionEmpty {
                    reason: format!("no instances match {}", request.target),
                },
            );
        }

        Ok(instances
            .into_iter()
            .map(|target| {
                Payload::Deploy(Deploy {
                    release: request.release.clone(),
                    target,
                })
            })
            .collect())
    }

    fn can_process_payload(&self, payload: &Payload) -> Result<(), String> {
        match payload {
            Payload::Deploy(_) => Ok(()),
            other => Err(format!("expected a deploy payload, got {}", other.kind())),
        }
    }

    fn do_execute(
        &self,
        payload: &mut Payload,
        progress: &Progress<'_>,
    ) -> Result<(), ActionFailure> {
        match payload {
            Payload::Deploy(deploy) => {
                let archive = self.archive(&deploy.release, progress)?;
                Ok(self.install(deploy, archive, progress)?)
            }
            other => Err(ExecutionError::UnsupportedPayload {
                description: other.describe(),
            }
            .into()),
        }
    }
}
