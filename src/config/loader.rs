//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

use super::types::Config;

/// Project-local configuration file name
pub const CONFIG_FILE: &str = "shipyard.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> ConfigResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_with_warnings(&content, path)
}

/// Parse configuration text; `path` is only used for diagnostics
pub fn parse_with_warnings(content: &str, path: &Path) -> ConfigResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Candidate configuration files, in lookup order
pub fn search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }

    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("shipyard/config.toml"));
    }
    paths
}

/// Find and load the first existing configuration file.
///
/// An explicit path must exist; otherwise the project file wins over the
/// user file.
pub fn discover(explicit: Option<&Path>) -> ConfigResult<(Config, PathBuf, Vec<ConfigWarning>)> {
    let searched = search_paths(explicit);
    let Some(path) = searched.iter().find(|p| p.is_file()).cloned() else {
        return Err(ConfigError::NotFound { searched });
    };

    let (config, warnings) = load_with_warnings(&path)?;
    Ok((config, path, warnings))
}

/// Apply environment variable overrides (SHIPYARD_* prefix)
pub fn with_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    // SHIPYARD_REPOSITORY
    if let Some(repository) = lookup("SHIPYARD_REPOSITORY").filter(|v| !v.trim().is_empty()) {
        config.build.repository = Some(repository);
    }

    // SHIPYARD_RELEASES_PATH
    if let Some(path) = lookup("SHIPYARD_RELEASES_PATH").filter(|v| !v.trim().is_empty()) {
        config.releases.path = PathBuf::from(path);
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "build",
        "repository",
        "path",
        "connection",
        "type",
        "destination",
        "releases",
        "shared_folders",
        "servers",
        "name",
        "keep_releases",
        "environments",
        "tasks",
        "working_folder",
        "pre",
        "commands",
        "post",
        "policies",
        "filter",
        "layers",
        "commitishes",
    ];

    let mut best: Option<(&str, usize)> = None;
    for &candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
