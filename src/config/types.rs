//! Configuration type definitions

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::Task;
use crate::domain::policies::{Policy, PolicyKind};
use crate::domain::value_objects::{Filter, StageLayers};
use crate::error::{ConfigError, ConfigResult};

use super::loader::{self, ConfigWarning};

/// Name of the task that builds a release
pub const RELEASE_TASK: &str = "release";
/// Name of the task run inside a new installation before activation
pub const DEPLOY_TASK: &str = "deploy";

/// How to reach a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConnectionConfig {
    #[default]
    Local,
    Ssh {
        destination: String,
    },
}

/// Where and how releases are built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// `owner/name` on GitHub, or any git URL
    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default = "default_build_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub connection: ConnectionConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            repository: None,
            path: default_build_path(),
            connection: ConnectionConfig::default(),
        }
    }
}

fn default_build_path() -> PathBuf {
    std::env::temp_dir().join("shipyard-build")
}

/// Local store of packaged releases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleasesConfig {
    #[serde(default = "default_releases_path")]
    pub path: PathBuf,
}

impl Default for ReleasesConfig {
    fn default() -> Self {
        Self {
            path: default_releases_path(),
        }
    }
}

fn default_releases_path() -> PathBuf {
    PathBuf::from(".shipyard/releases")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,

    /// Base folder holding `<environment>/<stage>` instances
    pub path: PathBuf,

    #[serde(default = "default_keep_releases")]
    pub keep_releases: usize,

    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Environment name to stage names
    #[serde(default)]
    pub environments: BTreeMap<String, Vec<String>>,
}

fn default_keep_releases() -> usize {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaskConfig {
    #[serde(default)]
    pub working_folder: Option<PathBuf>,

    #[serde(default)]
    pub pre: Vec<String>,

    #[serde(default)]
    pub commands: Vec<String>,

    #[serde(default)]
    pub post: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyConfig {
    SameRelease {
        #[serde(default)]
        filter: Option<String>,
    },
    StageWriteDown {
        #[serde(default)]
        filter: Option<String>,
        layers: Vec<Vec<String>>,
    },
    ReleaseWhitelist {
        #[serde(default)]
        filter: Option<String>,
        commitishes: Vec<String>,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub releases: ReleasesConfig,

    #[serde(default)]
    pub shared_folders: Vec<String>,

    #[serde(default)]
    pub servers: Vec<ServerConfig>,

    #[serde(default)]
    pub tasks: BTreeMap<String, TaskConfig>,

    #[serde(default)]
    pub policies: Vec<PolicyConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> ConfigResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Apply environment variable overrides (SHIPYARD_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self, |key| std::env::var(key).ok())
    }

    /// Check cross-references that the schema cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        let mut names = HashSet::new();
        for server in &self.servers {
            if !names.insert(server.name.as_str()) {
                return Err(ConfigError::DuplicateServer {
                    name: server.name.clone(),
                });
            }
        }
        self.policies().map(|_| ())
    }

    /// Every stage declared by any server
    pub fn declared_stages(&self) -> BTreeSet<&str> {
        self.servers
            .iter()
            .flat_map(|server| server.environments.values())
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Build the configured policies
    pub fn policies(&self) -> ConfigResult<Vec<Policy>> {
        let stages = self.declared_stages();
        self.policies
            .iter()
            .map(|policy| {
                let (kind, filter) = match policy {
                    PolicyConfig::SameRelease { filter } => (PolicyKind::SameRelease, filter),
                    PolicyConfig::StageWriteDown { filter, layers } => {
                        let layers = StageLayers::new(layers.clone());
                        if let Some(unknown) = layers.stages().find(|s| !stages.contains(s)) {
                            return Err(ConfigError::UnknownStage {
                                stage: unknown.to_string(),
                            });
                        }
                        (PolicyKind::StageWriteDown(layers), filter)
                    }
                    PolicyConfig::ReleaseWhitelist {
                        filter,
                        commitishes,
                    } => (
                        PolicyKind::ReleaseWhitelist {
                            commitishes: commitishes.clone(),
                        },
                        filter,
                    ),
                };
                let filter = filter.as_deref().map(Filter::parse).transpose()?;
                Ok(Policy::new(kind, filter))
            })
            .collect()
    }

    /// The named task, if configured
    pub fn task(&self, name: &str) -> Option<Task> {
        self.tasks.get(name).map(|config| {
            let task = Task::new(name)
                .with_pre_commands(config.pre.clone())
                .with_commands(config.commands.clone())
                .with_post_commands(config.post.clone());
            match &config.working_folder {
                Some(folder) => task.with_working_folder(folder),
                None => task,
            }
        })
    }

    /// The named task, or a configuration error
    pub fn require_task(&self, name: &str) -> ConfigResult<Task> {
        self.task(name).ok_or_else(|| ConfigError::MissingTask {
            name: name.to_string(),
        })
    }

    pub fn repository(&self) -> ConfigResult<&str> {
        self.build
            .repository
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .ok_or(ConfigError::MissingRepository)
    }
}
