//! Remote Connection
//!
//! Tunnels every command through a single `ssh` invocation. File contents
//! are staged in local temporary files and transferred with rsync.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use super::run_shell;
use crate::domain::entities::Task;
use crate::domain::ports::{
    CommandOutput, Connection, ConnectionError, ConnectionResult, Endpoint,
};
use crate::infrastructure::command_builder::{CommandBuilder, EXISTS_MARKER};

#[derive(Debug, Clone)]
pub struct RemoteConnection {
    /// SSH destination (user@host or host)
    destination: String,
    commands: CommandBuilder,
}

impl RemoteConnection {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            commands: CommandBuilder,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// The local command line that runs `command` on the remote host
    pub fn wrap(&self, command: &str, working_folder: Option<&Path>) -> String {
        let inner = match working_folder {
            Some(folder) => self.commands.in_folder(folder, command),
            None => command.to_string(),
        };
        self.commands.ssh(&self.destination, &inner)
    }

    /// rsync address of `path` on the remote host
    fn remote_spec(&self, path: &Path) -> String {
        format!("{}:{}", self.destination, path.display())
    }

    fn check_marker(&self, command: &str) -> ConnectionResult<bool> {
        marker_result(self.run(command, None)?)
    }
}

/// Interpret an existence test: `test` exits 1 when the path is absent,
/// any other failure (ssh itself exits 255) is an error.
fn marker_result(output: CommandOutput) -> ConnectionResult<bool> {
    match output.exit_code {
        Some(0) => Ok(output.stdout.contains(EXISTS_MARKER)),
        Some(1) => Ok(false),
        exit_code => Err(ConnectionError::CommandFailed {
            command: output.command,
            exit_code,
            stderr: output.stderr,
        }),
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ConnectionError + '_ {
    move |source| ConnectionError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Connection for RemoteConnection {
    fn endpoint(&self) -> Endpoint {
        Endpoint::Remote {
            destination: self.destination.clone(),
        }
    }

    fn run(&self, command: &str, working_folder: Option<&Path>) -> ConnectionResult<CommandOutput> {
        let wrapped = self.wrap(command, working_folder);
        debug!(destination = %self.destination, cmd = %command, "running remote command");
        run_shell(&wrapped, None)
    }

    fn execute_task(&self, task: &Task) -> ConnectionResult<Vec<CommandOutput>> {
        let folder = task.working_folder();
        if let Some(folder) = folder {
            self.run(&self.commands.create_folder(folder), None)?
                .into_result()?;
        }

        debug!(destination = %self.destination, task = task.name(), "executing task");
        task.all_commands()
            .iter()
            .map(|command| self.run(command, folder)?.into_result())
            .collect()
    }

    fn read_file(&self, path: &Path) -> ConnectionResult<Vec<u8>> {
        let staging = tempfile::tempdir().map_err(io_error(path))?;
        let local = staging.path().join("content");

        debug!(destination = %self.destination, path = %path.display(), "fetching remote file");
        let command = self.commands.rsync(&self.remote_spec(path), &local.to_string_lossy());
        run_shell(&command, None)?.into_result()?;

        std::fs::read(&local).map_err(io_error(&local))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> ConnectionResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.run(&self.commands.create_folder(parent), None)?
                .into_result()?;
        }

        let mut staged = tempfile::NamedTempFile::new().map_err(io_error(path))?;
        staged.write_all(content).map_err(io_error(path))?;
        staged.flush().map_err(io_error(path))?;

        debug!(destination = %self.destination, path = %path.display(), bytes = content.len(), "uploading remote file");
        let command = self
            .commands
            .rsync(&staged.path().to_string_lossy(), &self.remote_spec(path));
        run_shell(&command, None)?.into_result().map(|_| ())
    }

    fn get_folders(&self, dir: &Path) -> ConnectionResult<Vec<String>> {
        let output = self
            .run(&self.commands.list_folders(dir), None)?
            .into_result()?;
        Ok(parse_folder_listing(&output.stdout))
    }

    fn check_file_exists(&self, path: &Path) -> ConnectionResult<bool> {
        self.check_marker(&self.commands.test_file_exists(path))
    }

    fn check_folder_exists(&self, path: &Path) -> ConnectionResult<bool> {
        self.check_marker(&self.commands.test_folder_exists(path))
    }
}

/// Turn `ls -1d dir/*/` output into sorted folder names
fn parse_folder_listing(stdout: &str) -> Vec<String> {
    let mut folders: Vec<String> = stdout
        .lines()
        .map(|line| line.trim().trim_end_matches('/'))
        .filter_map(|line| line.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    folders.sort();
    folders
}
