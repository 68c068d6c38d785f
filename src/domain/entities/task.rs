//! Task - a named list of shell commands run inside a working folder.

use std::path::{Path, PathBuf};

/// Commands executed in order: `pre`, then `commands`, then `post`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
    name: String,
    working_folder: Option<PathBuf>,
    pre: Vec<String>,
    commands: Vec<String>,
    post: Vec<String>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_commands(mut self, commands: Vec<String>) -> Self {
        self.commands = commands;
        self
    }

    pub fn with_pre_commands(mut self, pre: Vec<String>) -> Self {
        self.pre = pre;
        self
    }

    pub fn with_post_commands(mut self, post: Vec<String>) -> Self {
        self.post = post;
        self
    }

    pub fn with_working_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.working_folder = Some(folder.into());
        self
    }

    pub fn add_pre_command(&mut self, command: impl Into<String>) {
        self.pre.push(command.into());
    }

    pub fn add_post_command(&mut self, command: impl Into<String>) {
        self.post.push(command.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn working_folder(&self) -> Option<&Path> {
        self.working_folder.as_deref()
    }

    /// All commands in execution order
    pub fn all_commands(&self) -> Vec<String> {
        self.pre
            .iter()
            .chain(&self.commands)
            .chain(&self.post)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.commands.is_empty() && self.post.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_run_pre_main_post() {
        let mut task = Task::new("release").with_commands(vec!["make".to_string()]);
        task.add_pre_command("git fetch");
        task.add_post_command("tar -czf out.tar.gz .");

        assert_eq!(
            task.all_commands(),
            vec!["git fetch", "make", "tar -czf out.tar.gz ."]
        );
    }

    #[test]
    fn empty_task() {
        assert!(Task::new("deploy").is_empty());
        assert!(Task::new("deploy").working_folder().is_none());
    }
}
