//! Error types for Shipyard
//!
//! Library errors use `thiserror`. Per-payload failures are not errors at this
//! level: they are collected in an [`ActionReport`](crate::application::ActionReport)
//! so that one bad target never aborts its siblings.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::RepositoryError;
use crate::domain::value_objects::FilterError;

/// Result type alias for Shipyard operations
pub type ShipyardResult<T> = Result<T, ShipyardError>;

/// Result type alias for configuration handling
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that abort a whole invocation
#[derive(Error, Debug)]
pub enum ShipyardError {
    /// Configuration is unusable; nothing was executed
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Instance state could not be loaded from a server
    #[error("failed to load instance state: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<FilterError> for ShipyardError {
    fn from(err: FilterError) -> Self {
        ShipyardError::Config(ConfigError::Filter(err))
    }
}

/// Configuration errors (fatal for the invocation)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No configuration file could be located
    #[error("no configuration file found (looked for {})", .searched.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    NotFound { searched: Vec<PathBuf> },

    /// Configuration file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for the expected schema
    #[error("invalid configuration in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// A target or policy filter specification is malformed
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// A layering policy names a stage no server declares
    #[error("stage '{stage}' in stage_write_down policy is not declared by any server")]
    UnknownStage { stage: String },

    /// A task required by an action is not configured
    #[error("task '{name}' is not configured (add a [tasks.{name}] section)")]
    MissingTask { name: String },

    /// Building releases requires `build.repository`
    #[error("build.repository is not configured")]
    MissingRepository,

    /// The same server name is declared twice
    #[error("server '{name}' is declared more than once")]
    DuplicateServer { name: String },
}
