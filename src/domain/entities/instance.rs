//! Instance entity - the (server, environment, stage) unit of deployment.
//!
//! An instance owns its installations as a vector kept sorted by number
//! (binary search serves as the index) and refers to the active one by
//! number only.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::Installation;
use crate::domain::ports::Connection;

/// Folder below an instance holding one sub-folder per installation
pub const INSTALLATIONS_FOLDER: &str = "installations";
/// Symlink below an instance pointing at the active installation
pub const CURRENT_LINK: &str = "current";
/// Folder below an instance holding data shared between installations
pub const SHARED_FOLDER: &str = "shared";

/// Errors raised when the installation invariants would be violated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    #[error("installation #{0} already exists")]
    DuplicateInstallation(u32),

    #[error("installation #{0} does not exist")]
    UnknownInstallation(u32),

    #[error("installation #{0} is active and cannot be removed")]
    RemovingCurrent(u32),
}

/// A named host reachable through a [`Connection`].
#[derive(Debug)]
pub struct Server {
    name: String,
    path: PathBuf,
    connection: Arc<dyn Connection>,
    keep_releases: usize,
}

impl Server {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        connection: Arc<dyn Connection>,
        keep_releases: usize,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            connection,
            keep_releases,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base folder below which `<environment>/<stage>` instances live
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    pub fn keep_releases(&self) -> usize {
        self.keep_releases
    }
}

/// Logical grouping of instances (a customer, a cluster, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Environment {
    name: String,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A deployment target and the installations it carries.
#[derive(Debug, Clone)]
pub struct Instance {
    server: Arc<Server>,
    environment: Environment,
    stage: String,
    installations: Vec<Installation>,
    current: Option<u32>,
}

impl Instance {
    /// Create an instance without installations
    pub fn new(server: Arc<Server>, environment: Environment, stage: impl Into<String>) -> Self {
        Self {
            server,
            environment,
            stage: stage.into(),
            installations: Vec::new(),
            current: None,
        }
    }

    /// Create an instance from loaded state.
    ///
    /// Installations may come in any order; duplicates are rejected and the
    /// current number must name one of them.
    pub fn with_installations(
        server: Arc<Server>,
        environment: Environment,
        stage: impl Into<String>,
        installations: Vec<Installation>,
        current: Option<u32>,
    ) -> Result<Self, InstanceError> {
        let mut instance = Self::new(server, environment, stage);
        for installation in installations {
            instance.add_installation(installation)?;
        }
        if let Some(number) = current {
            instance.set_current(number)?;
        }
        Ok(instance)
    }

    pub fn server(&self) -> &Arc<Server> {
        &self.server
    }

    pub fn server_name(&self) -> &str {
        self.server.name()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_name(&self) -> &str {
        self.environment.name()
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        self.server.connection()
    }

    pub fn keep_releases(&self) -> usize {
        self.server.keep_releases()
    }

    /// Installations in ascending number order
    pub fn installations(&self) -> &[Installation] {
        &self.installations
    }

    pub fn installation(&self, number: u32) -> Option<&Installation> {
        self.position(number)
            .ok()
            .map(|index| &self.installations[index])
    }

    pub fn current_installation(&self) -> Option<&Installation> {
        self.current.and_then(|number| self.installation(number))
    }

    pub fn current_number(&self) -> Option<u32> {
        self.current
    }

    pub fn current_release_name(&self) -> Option<&str> {
        self.current_installation()
            .map(|installation| installation.release().name())
    }

    pub fn is_current_release(&self, release_name: &str) -> bool {
        self.current_installation()
            .is_some_and(|installation| installation.is_same_release_name(release_name))
    }

    /// All installations of the named release, ascending
    pub fn installations_by_release_name(&self, release_name: &str) -> Vec<&Installation> {
        self.installations
            .iter()
            .filter(|installation| installation.is_same_release_name(release_name))
            .collect()
    }

    /// The installation with the greatest number below the current one.
    pub fn previous_installation(&self) -> Option<&Installation> {
        let current = self.current_installation()?.number();
        self.installations
            .iter()
            .filter(|installation| installation.number() < current)
            .max_by_key(|installation| installation.number())
    }

    /// Resolve which installation a rollback should activate.
    ///
    /// `rollback_from` guards against stale expectations: when given it must
    /// name the active release. Without `rollback_to` the previous
    /// installation is chosen; otherwise the newest older installation of that
    /// release, which must not be the active release itself.
    pub fn rollback_target(
        &self,
        rollback_to: Option<&str>,
        rollback_from: Option<&str>,
    ) -> Option<&Installation> {
        let current = self.current_installation()?;

        if let Some(from) = rollback_from {
            if !self.is_current_release(from) {
                return None;
            }
        }

        let Some(to) = rollback_to else {
            return self.previous_installation();
        };

        if self.is_current_release(to) {
            return None;
        }

        self.installations_by_release_name(to)
            .into_iter()
            .filter(|installation| installation.number() < current.number())
            .max_by_key(|installation| installation.number())
    }

    /// Number for the next installation (one above the highest, starting at 1)
    pub fn next_installation_number(&self) -> u32 {
        self.installations
            .last()
            .map_or(1, |installation| installation.number() + 1)
    }

    /// Insert an installation, keeping ascending order
    pub fn add_installation(&mut self, installation: Installation) -> Result<(), InstanceError> {
        match self.position(installation.number()) {
            Ok(_) => Err(InstanceError::DuplicateInstallation(installation.number())),
            Err(index) => {
                self.installations.insert(index, installation);
                Ok(())
            }
        }
    }

    /// Point the current reference at an existing installation
    pub fn set_current(&mut self, number: u32) -> Result<(), InstanceError> {
        if self.position(number).is_err() {
            return Err(InstanceError::UnknownInstallation(number));
        }
        self.current = Some(number);
        Ok(())
    }

    /// Drop an installation that is not active
    pub fn remove_installation(&mut self, number: u32) -> Result<Installation, InstanceError> {
        if self.current == Some(number) {
            return Err(InstanceError::RemovingCurrent(number));
        }
        let index = self
            .position(number)
            .map_err(|_| InstanceError::UnknownInstallation(number))?;
        Ok(self.installations.remove(index))
    }

    /// Installations that exceed the retention count, oldest first.
    ///
    /// The active installation is never included.
    pub fn installations_to_prune(&self) -> Vec<u32> {
        let keep = self.keep_releases().max(1);
        let excess = self.installations.len().saturating_sub(keep);
        self.installations
            .iter()
            .map(Installation::number)
            .filter(|number| Some(*number) != self.current)
            .take(excess)
            .collect()
    }

    /// Instances from `instances` in the same environment as this one
    pub fn same_environment_instances<'a>(&self, instances: &'a [Instance]) -> Vec<&'a Instance> {
        instances
            .iter()
            .filter(|other| other.environment_name() == self.environment_name())
            .collect()
    }

    /// `<server path>/<environment>/<stage>`
    pub fn path(&self) -> PathBuf {
        self.server
            .path()
            .join(self.environment.name())
            .join(&self.stage)
    }

    pub fn installations_path(&self) -> PathBuf {
        self.path().join(INSTALLATIONS_FOLDER)
    }

    pub fn installation_path(&self, number: u32) -> PathBuf {
        self.installations_path().join(number.to_string())
    }

    pub fn current_link_path(&self) -> PathBuf {
        self.path().join(CURRENT_LINK)
    }

    pub fn shared_path(&self) -> PathBuf {
        self.path().join(SHARED_FOLDER)
    }

    /// Stable identity string `server:environment:stage`
    pub fn describe(&self) -> String {
        format!(
            "{}:{}:{}",
            self.server_name(),
            self.environment_name(),
            self.stage
        )
    }

    fn position(&self, number: u32) -> Result<usize, usize> {
        self.installations
            .binary_search_by_key(&number, Installation::number)
    }
}

/// Instances are equal when they name the same server, environment and stage.
impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.server_name() == other.server_name()
            && self.environment_name() == other.environment_name()
            && self.stage == other.stage
    }
}

impl Eq for Instance {}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
