//! Connection port - command execution and file transfer against one host
//!
//! Implementations:
//! - `LocalConnection` - runs commands on this machine
//! - `RemoteConnection` - tunnels commands through ssh, transfers with rsync

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::entities::Task;

/// Result type for connection operations
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Connection failures
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Command ran but exited unsuccessfully
    #[error("command `{command}` failed with exit code {}: {}", .exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()), .stderr.trim())]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Command could not be started at all
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Local I/O failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Captured result of one executed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub command: String,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero exit into [`ConnectionError::CommandFailed`]
    pub fn into_result(self) -> ConnectionResult<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(ConnectionError::CommandFailed {
                command: self.command,
                exit_code: self.exit_code,
                stderr: self.stderr,
            })
        }
    }
}

/// The machine a connection talks to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Local,
    Remote { destination: String },
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Local => f.write_str("local"),
            Endpoint::Remote { destination } => write!(f, "ssh://{}", destination),
        }
    }
}

/// Abstract execution target
pub trait Connection: Send + Sync + fmt::Debug {
    /// Identity of the target machine
    fn endpoint(&self) -> Endpoint;

    /// Run a single command, optionally inside `working_folder`.
    ///
    /// Returns the captured output whatever the exit status.
    fn run(&self, command: &str, working_folder: Option<&Path>) -> ConnectionResult<CommandOutput>;

    /// Run commands in order, stopping at the first non-zero exit
    fn execute(&self, commands: &[String]) -> ConnectionResult<Vec<CommandOutput>> {
        commands
            .iter()
            .map(|command| self.run(command, None)?.into_result())
            .collect()
    }

    /// Run all commands of a task inside its working folder
    fn execute_task(&self, task: &Task) -> ConnectionResult<Vec<CommandOutput>>;

    fn read_file(&self, path: &Path) -> ConnectionResult<Vec<u8>>;

    fn write_file(&self, path: &Path, content: &[u8]) -> ConnectionResult<()>;

    /// Names of the immediate sub-folders of `dir`, sorted; empty if `dir` is missing
    fn get_folders(&self, dir: &Path) -> ConnectionResult<Vec<String>>;

    fn check_file_exists(&self, path: &Path) -> ConnectionResult<bool>;

    fn check_folder_exists(&self, path: &Path) -> ConnectionResult<bool>;

    /// Whether both connections reach the same machine.
    ///
    /// Compares kind and destination, so two ssh connections to different
    /// hosts are not the same machine.
    fn same_machine(&self, other: &dyn Connection) -> bool {
        self.endpoint() == other.endpoint()
    }
}
