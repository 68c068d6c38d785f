//! ReleaseStore port - where packaged releases are published and fetched.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::entities::Release;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("release store I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("archive {archive} failed checksum verification (expected {expected}, found {actual})")]
    ChecksumMismatch {
        archive: String,
        expected: String,
        actual: String,
    },
}

pub trait ReleaseStore: Send + Sync {
    /// Publish a packaged release under `archive_name`
    fn publish(&self, release: &Release, archive_name: &str, content: &[u8])
        -> Result<(), StoreError>;

    /// Fetch a previously published release, `None` if it was never published
    fn fetch(&self, release: &Release) -> Result<Option<Vec<u8>>, StoreError>;
}
