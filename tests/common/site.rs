//! A deployment site rooted in a temp directory.

use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use shipyard::domain::entities::Server;
use shipyard::domain::ports::{InstanceRepository, ReleaseStore};
use shipyard::infrastructure::{
    ConnectionInstanceRepository, FolderReleaseStore, LocalConnection, ServerLayout,
};
use shipyard::{Filter, Installation, Instance, Release};
use tempfile::TempDir;

pub const SERVER: &str = "web";
pub const ENVIRONMENT: &str = "acme";

/// One local server with a single environment and the given stages.
pub struct Site {
    root: TempDir,
    keep_releases: usize,
    stages: Vec<String>,
}

impl Site {
    pub fn new(stages: &[&str]) -> Self {
        Self::with_keep_releases(stages, 2)
    }

    pub fn with_keep_releases(stages: &[&str], keep_releases: usize) -> Self {
        Self {
            root: TempDir::new().unwrap(),
            keep_releases,
            stages: stages.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn server_path(&self) -> PathBuf {
        self.root().join("servers").join(SERVER)
    }

    pub fn releases_path(&self) -> PathBuf {
        self.root().join("releases")
    }

    pub fn stage_path(&self, stage: &str) -> PathBuf {
        self.server_path().join(ENVIRONMENT).join(stage)
    }

    pub fn repository(&self) -> Arc<ConnectionInstanceRepository> {
        let server = Arc::new(Server::new(
            SERVER,
            self.server_path(),
            Arc::new(LocalConnection::new()),
            self.keep_releases,
        ));
        let mut environments = BTreeMap::new();
        environments.insert(ENVIRONMENT.to_string(), self.stages.clone());
        Arc::new(ConnectionInstanceRepository::new(vec![ServerLayout::new(
            server,
            environments,
        )]))
    }

    pub fn store(&self) -> Arc<FolderReleaseStore> {
        Arc::new(FolderReleaseStore::new(self.releases_path()))
    }

    pub fn instance(&self, stage: &str) -> Instance {
        self.repository()
            .find(&Filter::exact(SERVER, ENVIRONMENT, stage))
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    /// Publish an archive holding `files` for `release`
    pub fn publish(&self, release: &Release, files: &[(&str, &str)]) {
        self.store()
            .publish(release, &release.archive_name(), &super::tar_gz(files))
            .unwrap();
    }

    /// Create installation folders with metadata, in order, and activate `current`.
    pub fn seed(&self, stage: &str, releases: &[&str], current: Option<u32>) {
        let instance = self.instance(stage);
        let repository = self.repository();
        for (index, name) in releases.iter().enumerate() {
            let number = index as u32 + 1;
            let installation = Installation::new(
                number,
                Release::new(*name, None),
                Utc.with_ymd_and_hms(2024, 3, number, 9, 0, 0).unwrap(),
            );
            repository
                .record_installation(&instance, &installation)
                .unwrap();
        }
        if let Some(number) = current {
            self.point_current(stage, number);
        }
    }

    pub fn point_current(&self, stage: &str, number: u32) {
        let link = self.stage_path(stage).join("current");
        let _ = fs::remove_file(&link);
        symlink(self.installation_path(stage, number), link).unwrap();
    }

    pub fn installation_path(&self, stage: &str, number: u32) -> PathBuf {
        self.stage_path(stage)
            .join("installations")
            .join(number.to_string())
    }

    /// Installation number the `current` symlink resolves to
    pub fn current_number(&self, stage: &str) -> Option<u32> {
        let target = fs::read_link(self.stage_path(stage).join("current")).ok()?;
        target.file_name()?.to_str()?.parse().ok()
    }

    /// Installation folder numbers present on disk, ascending
    pub fn installation_numbers(&self, stage: &str) -> Vec<u32> {
        let Ok(entries) = fs::read_dir(self.stage_path(stage).join("installations")) else {
            return Vec::new();
        };
        let mut numbers: Vec<u32> = entries
            .filter_map(|entry| entry.ok()?.file_name().to_str()?.parse().ok())
            .collect();
        numbers.sort_unstable();
        numbers
    }

    pub fn read_current(&self, stage: &str, file: &str) -> String {
        fs::read_to_string(self.stage_path(stage).join("current").join(file)).unwrap()
    }

    pub fn write_shared(&self, stage: &str, file: &str, content: &str) {
        let path = self.stage_path(stage).join("shared").join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn read_shared(&self, stage: &str, file: &str) -> Option<String> {
        fs::read_to_string(self.stage_path(stage).join("shared").join(file)).ok()
    }
}
