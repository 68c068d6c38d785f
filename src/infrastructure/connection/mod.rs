//! Connection implementations
//!
//! - `LocalConnection` - commands through the local `sh`
//! - `RemoteConnection` - commands through `ssh`, files through rsync

mod local;
mod remote;

pub use local::LocalConnection;
pub use remote::RemoteConnection;

use std::path::Path;
use std::process::{Command, Stdio};

use crate::domain::ports::{CommandOutput, ConnectionError, ConnectionResult};

/// Run `command` with the local `sh`, capturing its output
fn run_shell(command: &str, current_dir: Option<&Path>) -> ConnectionResult<CommandOutput> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = current_dir {
        cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|source| ConnectionError::Spawn {
        command: command.to_string(),
        source,
    })?;
    Ok(CommandOutput {
        command: command.to_string(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
