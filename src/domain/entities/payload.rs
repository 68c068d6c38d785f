//! Payloads - typed units of work handed through the action pipeline.

use super::{Installation, Instance, Release};

/// Install a release onto an instance
#[derive(Debug, Clone)]
pub struct Deploy {
    pub release: Release,
    pub target: Instance,
}

/// Re-activate an older installation of an instance
#[derive(Debug, Clone)]
pub struct Rollback {
    pub target: Instance,
    pub installation: Installation,
}

/// Copy shared data from one stage of an environment to another
#[derive(Debug, Clone)]
pub struct CopyShared {
    pub source: Instance,
    pub target: Instance,
}

/// One unit of work
#[derive(Debug, Clone)]
pub enum Payload {
    Deploy(Deploy),
    Rollback(Rollback),
    CopyShared(CopyShared),
    /// Build and publish a release
    Release(Release),
}

impl Payload {
    /// Human-readable description used in reports
    pub fn describe(&self) -> String {
        match self {
            Payload::Deploy(deploy) => format!("deploy {} to {}", deploy.release, deploy.target),
            Payload::Rollback(rollback) => format!(
                "rollback {} to {} (installation #{})",
                rollback.target,
                rollback.installation.release(),
                rollback.installation.number()
            ),
            Payload::CopyShared(copy) => {
                format!("copy shared from {} to {}", copy.source, copy.target)
            }
            Payload::Release(release) => format!("build {}", release.commitish()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Deploy(_) => "deploy",
            Payload::Rollback(_) => "rollback",
            Payload::CopyShared(_) => "copy-shared",
            Payload::Release(_) => "release",
        }
    }
}
