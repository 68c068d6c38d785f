//! Action Factory
//!
//! Creates actions with infrastructure dependencies wired up.
//! This is the dependency injection point for the application: every
//! collaborator is built from the configuration and passed down explicitly.

use std::sync::Arc;

use tracing::debug;

use crate::application::{
    ActionRunner, CopySharedAction, DeployAction, ReleaseAction, ReleaseBuilder, RollbackAction,
};
use crate::config::{Config, ConnectionConfig, DEPLOY_TASK, RELEASE_TASK};
use crate::domain::entities::Server;
use crate::domain::policies::PolicyEngine;
use crate::domain::ports::{ActionEventSink, Connection, InstanceRepository, ReleaseStore};
use crate::error::{ConfigError, ConfigResult};
use crate::infrastructure::{
    ConnectionInstanceRepository, FolderReleaseStore, JsonEventSink, LocalConnection,
    RemoteConnection, ServerLayout, TracingEventSink,
};

/// Create the connection described by `config`
pub fn create_connection(config: &ConnectionConfig) -> Arc<dyn Connection> {
    match config {
        ConnectionConfig::Local => Arc::new(LocalConnection::new()),
        ConnectionConfig::Ssh { destination } => Arc::new(RemoteConnection::new(destination.clone())),
    }
}

/// Servers and the instances they host
pub fn create_server_layouts(config: &Config) -> Vec<ServerLayout> {
    config
        .servers
        .iter()
        .map(|server| {
            let connection = create_connection(&server.connection);
            ServerLayout::new(
                Arc::new(Server::new(
                    server.name.clone(),
                    server.path.clone(),
                    connection,
                    server.keep_releases,
                )),
                server.environments.clone(),
            )
        })
        .collect()
}

pub fn create_instance_repository(config: &Config) -> Arc<dyn InstanceRepository> {
    Arc::new(ConnectionInstanceRepository::new(create_server_layouts(
        config,
    )))
}

pub fn create_release_store(config: &Config) -> Arc<dyn ReleaseStore> {
    Arc::new(FolderReleaseStore::new(config.releases.path.clone()))
}

/// Builder for releases; needs `build.repository` and the release task
pub fn create_release_builder(config: &Config) -> ConfigResult<ReleaseBuilder> {
    let repository = config.repository()?;
    let task = config.require_task(RELEASE_TASK)?;
    Ok(ReleaseBuilder::new(
        create_connection(&config.build.connection),
        repository,
        config.build.path.clone(),
        task,
    ))
}

/// Event sink for `--json` (NDJSON on stdout) or log output
pub fn create_event_sink(json: bool) -> Arc<dyn ActionEventSink> {
    if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(TracingEventSink)
    }
}

pub fn create_runner(config: &Config, events: Arc<dyn ActionEventSink>) -> ConfigResult<ActionRunner> {
    Ok(ActionRunner::new(PolicyEngine::new(config.policies()?)).with_events(events))
}

/// Deploy action; builds on demand when a build is configured.
///
/// On-demand builds go through the same policies as `release`. A build
/// section that names a repository but is otherwise incomplete is an error.
pub fn create_deploy_action(config: &Config) -> ConfigResult<DeployAction> {
    let mut action = DeployAction::new(
        create_instance_repository(config),
        create_release_store(config),
    )
    .with_shared_folders(config.shared_folders.clone());

    match create_release_builder(config) {
        Ok(builder) => {
            action = action.with_builder(builder, PolicyEngine::new(config.policies()?));
        }
        Err(ConfigError::MissingRepository) => {
            debug!("no build repository configured, deploy needs published releases");
        }
        Err(err) => return Err(err),
    }
    if let Some(task) = config.task(DEPLOY_TASK) {
        action = action.with_deploy_task(task);
    }
    Ok(action)
}

pub fn create_rollback_action(config: &Config) -> RollbackAction {
    RollbackAction::new(create_instance_repository(config))
}

pub fn create_copy_shared_action(config: &Config) -> CopySharedAction {
    CopySharedAction::new(
        create_instance_repository(config),
        config.shared_folders.clone(),
    )
}

pub fn create_release_action(config: &Config) -> ConfigResult<ReleaseAction> {
    Ok(ReleaseAction::new(
        create_release_builder(config)?,
        create_release_store(config),
    ))
}
