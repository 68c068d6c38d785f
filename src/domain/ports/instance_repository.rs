//! InstanceRepository port - reconstructs instances from persisted state.

use thiserror::Error;

use super::ConnectionError;
use crate::domain::entities::{Installation, Instance, InstanceError};
use crate::domain::value_objects::Filter;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("corrupted installation metadata at {path}: {message}")]
    Corrupted { path: String, message: String },

    #[error("inconsistent state for {instance}: {source}")]
    Inconsistent {
        instance: String,
        #[source]
        source: InstanceError,
    },
}

/// Source of truth for instances and their installations
pub trait InstanceRepository: Send + Sync {
    /// All configured instances matching `filter`, with installations loaded
    fn find(&self, filter: &Filter) -> Result<Vec<Instance>, RepositoryError>;

    /// Re-read which installation is currently active on the host
    fn current_number(&self, instance: &Instance) -> Result<Option<u32>, RepositoryError>;

    /// Persist the metadata of a freshly installed installation
    fn record_installation(
        &self,
        instance: &Instance,
        installation: &Installation,
    ) -> Result<(), RepositoryError>;

    /// Whether an installation's metadata is present on the host
    fn is_recorded(&self, instance: &Instance, number: u32) -> Result<bool, RepositoryError>;
}
