//! Folder Release Store
//!
//! Keeps packaged releases as `<root>/<archive>` with a `<archive>.sha256`
//! sidecar. Publishing holds an exclusive lock on `<root>/.lock`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::domain::entities::Release;
use crate::domain::ports::{ReleaseStore, StoreError};

const CHECKSUM_EXTENSION: &str = "sha256";
const LOCK_FILE: &str = ".lock";

pub struct FolderReleaseStore {
    root: PathBuf,
}

impl FolderReleaseStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn archive_path(&self, archive_name: &str) -> PathBuf {
        self.root.join(archive_name)
    }

    fn checksum_path(&self, archive_name: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", archive_name, CHECKSUM_EXTENSION))
    }

    fn write_atomic(&self, path: &Path, content: &[u8]) -> Result<(), StoreError> {
        let mut temp = tempfile::NamedTempFile::new_in(&self.root).map_err(io_error(&self.root))?;
        temp.write_all(content).map_err(io_error(path))?;
        temp.persist(path).map_err(|err| io_error(path)(err.error))?;
        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Hex-encoded SHA-256 of `content`
pub fn checksum(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}

impl ReleaseStore for FolderReleaseStore {
    fn publish(
        &self,
        release: &Release,
        archive_name: &str,
        content: &[u8],
    ) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(io_error(&self.root))?;

        let lock_path = self.root.join(LOCK_FILE);
        let lock_file = fs::File::create(&lock_path).map_err(io_error(&lock_path))?;
        lock_file.lock_exclusive().map_err(io_error(&lock_path))?;

        let archive = self.archive_path(archive_name);
        let result = self
            .write_atomic(&archive, content)
            .and_then(|_| {
                self.write_atomic(
                    &self.checksum_path(archive_name),
                    checksum(content).as_bytes(),
                )
            });

        let _ = lock_file.unlock();
        if result.is_ok() {
            info!(release = %release, archive = %archive.display(), bytes = content.len(), "release published");
        }
        result
    }

    fn fetch(&self, release: &Release) -> Result<Option<Vec<u8>>, StoreError> {
        let archive_name = release.archive_name();
        let archive = self.archive_path(&archive_name);
        if !archive.is_file() {
            debug!(release = %release, archive = %archive.display(), "release not in store");
            return Ok(None);
        }

        let content = fs::read(&archive).map_err(io_error(&archive))?;

        let sidecar = self.checksum_path(&archive_name);
        if sidecar.is_file() {
            let expected = fs::read_to_string(&sidecar).map_err(io_error(&sidecar))?;
            let expected = expected.trim();
            let actual = checksum(&content);
            if expected != actual {
                return Err(StoreError::ChecksumMismatch {
                    archive: archive_name,
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        Ok(Some(content))
    }
}
