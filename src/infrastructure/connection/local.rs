//! Local Connection
//!
//! Runs commands through `sh -c` on this machine and touches files directly.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use super::run_shell;
use crate::domain::entities::Task;
use crate::domain::ports::{
    CommandOutput, Connection, ConnectionError, ConnectionResult, Endpoint,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalConnection;

impl LocalConnection {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ConnectionError + '_ {
    move |source| ConnectionError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Connection for LocalConnection {
    fn endpoint(&self) -> Endpoint {
        Endpoint::Local
    }

    fn run(&self, command: &str, working_folder: Option<&Path>) -> ConnectionResult<CommandOutput> {
        debug!(cmd = %command, cwd = ?working_folder, "running local command");
        run_shell(command, working_folder)
    }

    fn execute_task(&self, task: &Task) -> ConnectionResult<Vec<CommandOutput>> {
        let folder = task.working_folder();
        if let Some(folder) = folder {
            fs::create_dir_all(folder).map_err(io_error(folder))?;
        }

        debug!(task = task.name(), cwd = ?folder, "executing task");
        task.all_commands()
            .iter()
            .map(|command| self.run(command, folder)?.into_result())
            .collect()
    }

    fn read_file(&self, path: &Path) -> ConnectionResult<Vec<u8>> {
        fs::read(path).map_err(io_error(path))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> ConnectionResult<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(io_error(parent))?;

        let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(io_error(parent))?;
        temp.write_all(content).map_err(io_error(path))?;
        temp.persist(path)
            .map_err(|err| io_error(path)(err.error))?;
        Ok(())
    }

    fn get_folders(&self, dir: &Path) -> ConnectionResult<Vec<String>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut folders = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error(dir))? {
            let entry = entry.map_err(io_error(dir))?;
            // follows symlinks, matching `ls -1d dir/*/`
            if entry.path().is_dir() {
                folders.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        folders.sort();
        Ok(folders)
    }

    fn check_file_exists(&self, path: &Path) -> ConnectionResult<bool> {
        Ok(path.is_file())
    }

    fn check_folder_exists(&self, path: &Path) -> ConnectionResult<bool> {
        Ok(path.is_dir())
    }
}
