//! Connection-backed Instance Repository
//!
//! Rebuilds instances from the server filesystem on every invocation:
//!
//! ```text
//! <server path>/<environment>/<stage>/
//!     installations/<number>/.installation.json
//!     current -> installations/<number>
//!     shared/<folder>
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::{Environment, Installation, Instance, Server};
use crate::domain::ports::{Connection, InstanceRepository, RepositoryError};
use crate::domain::value_objects::Filter;

/// Metadata file written into every installation folder
pub const INSTALLATION_METADATA: &str = ".installation.json";

/// A server and the environments/stages it hosts
#[derive(Debug, Clone)]
pub struct ServerLayout {
    pub server: Arc<Server>,
    /// Environment name to stage names
    pub environments: BTreeMap<String, Vec<String>>,
}

impl ServerLayout {
    pub fn new(server: Arc<Server>, environments: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            server,
            environments,
        }
    }
}

pub struct ConnectionInstanceRepository {
    layouts: Vec<ServerLayout>,
}

impl ConnectionInstanceRepository {
    pub fn new(layouts: Vec<ServerLayout>) -> Self {
        Self { layouts }
    }

    fn load(
        &self,
        server: &Arc<Server>,
        environment: &str,
        stage: &str,
    ) -> Result<Instance, RepositoryError> {
        let empty = Instance::new(Arc::clone(server), Environment::new(environment), stage);
        let connection = server.connection();

        let mut installations = Vec::new();
        for folder in connection.get_folders(&empty.installations_path())? {
            let Ok(number) = folder.parse::<u32>() else {
                debug!(instance = %empty, folder = %folder, "skipping non-installation folder");
                continue;
            };

            let metadata = empty.installation_path(number).join(INSTALLATION_METADATA);
            if !connection.check_file_exists(&metadata)? {
                warn!(instance = %empty, number, "installation folder without metadata, ignoring");
                continue;
            }

            let installation = read_metadata(connection.as_ref(), &metadata)?;
            if installation.number() != number {
                return Err(RepositoryError::Corrupted {
                    path: metadata.display().to_string(),
                    message: format!(
                        "metadata names installation #{} but lives in folder {}",
                        installation.number(),
                        number
                    ),
                });
            }
            installations.push(installation);
        }

        let current = read_current(connection.as_ref(), &empty)?.filter(|number| {
            let known = installations.iter().any(|i| i.number() == *number);
            if !known {
                warn!(instance = %empty, number, "current link points at an unknown installation");
            }
            known
        });

        Instance::with_installations(
            Arc::clone(server),
            Environment::new(environment),
            stage,
            installations,
            current,
        )
        .map_err(|source| RepositoryError::Inconsistent {
            instance: empty.describe(),
            source,
        })
    }
}

fn read_metadata(connection: &dyn Connection, path: &Path) -> Result<Installation, RepositoryError> {
    let bytes = connection.read_file(path)?;
    serde_json::from_slice(&bytes).map_err(|err| RepositoryError::Corrupted {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Installation number the `current` link resolves to, if any
fn read_current(
    connection: &dyn Connection,
    instance: &Instance,
) -> Result<Option<u32>, RepositoryError> {
    let metadata = instance.current_link_path().join(INSTALLATION_METADATA);
    if !connection.check_file_exists(&metadata)? {
        return Ok(None);
    }
    Ok(Some(read_metadata(connection, &metadata)?.number()))
}

impl InstanceRepository for ConnectionInstanceRepository {
    fn find(&self, filter: &Filter) -> Result<Vec<Instance>, RepositoryError> {
        let mut instances = Vec::new();
        for layout in &self.layouts {
            for (environment, stages) in &layout.environments {
                for stage in stages {
                    if filter.matches_identity(layout.server.name(), environment, stage) {
                        instances.push(self.load(&layout.server, environment, stage)?);
                    }
                }
            }
        }
        debug!(filter = %filter, count = instances.len(), "instances loaded");
        Ok(instances)
    }

    fn current_number(&self, instance: &Instance) -> Result<Option<u32>, RepositoryError> {
        read_current(instance.connection().as_ref(), instance)
    }

    fn record_installation(
        &self,
        instance: &Instance,
        installation: &Installation,
    ) -> Result<(), RepositoryError> {
        let path = instance
            .installation_path(installation.number())
            .join(INSTALLATION_METADATA);
        let json = serde_json::to_vec_pretty(installation).map_err(|err| {
            RepositoryError::Corrupted {
                path: path.display().to_string(),
                message: err.to_string(),
            }
        })?;
        instance.connection().write_file(&path, &json)?;
        Ok(())
    }

    fn is_recorded(&self, instance: &Instance, number: u32) -> Result<bool, RepositoryError> {
        let path = instance.installation_path(number).join(INSTALLATION_METADATA);
        Ok(instance.connection().check_file_exists(&path)?)
    }
}
