//! Installation entity - one numbered deployment of a release onto an instance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Release;

/// An immutable, numbered deployment of a [`Release`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    number: u32,
    release: Release,
    created_at: DateTime<Utc>,
}

impl Installation {
    pub fn new(number: u32, release: Release, created_at: DateTime<Utc>) -> Self {
        Self {
            number,
            release,
            created_at,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn release(&self) -> &Release {
        &self.release
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_same_release_name(&self, name: &str) -> bool {
        self.release.name() == name
    }
}
