//! Per-payload failure taxonomy

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::entities::InstanceError;
use crate::domain::policies::PolicyDenial;
use crate::domain::ports::{ConnectionError, RepositoryError, StoreError};

/// Why a payload (or a requested target) did not run to completion
#[derive(Error, Debug)]
pub enum ActionFailure {
    /// A filter or lookup selected nothing to act on
    #[error("{reason}")]
    SelectionEmpty { reason: String },

    /// The payload failed its structural precondition
    #[error("invalid payload: {reason}")]
    PayloadInvalid { reason: String },

    /// A policy refused the payload; nothing was executed
    #[error("denied by {policy} policy: {reason}")]
    PolicyDenied { policy: &'static str, reason: String },

    /// A side effect failed while executing
    #[error("execution failed: {0}")]
    ExecutionFailed(#[from] ExecutionError),
}

impl ActionFailure {
    /// Stable machine-readable name
    pub fn kind(&self) -> &'static str {
        match self {
            ActionFailure::SelectionEmpty { .. } => "selection_empty",
            ActionFailure::PayloadInvalid { .. } => "payload_invalid",
            ActionFailure::PolicyDenied { .. } => "policy_denied",
            ActionFailure::ExecutionFailed(_) => "execution_failed",
        }
    }
}

impl From<PolicyDenial> for ActionFailure {
    fn from(denial: PolicyDenial) -> Self {
        ActionFailure::PolicyDenied {
            policy: denial.policy,
            reason: denial.reason,
        }
    }
}

/// Errors raised while a payload executes
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Instance(#[from] InstanceError),

    /// Installation metadata was not found after installing
    #[error("installation at {} could not be confirmed", .path.display())]
    NotConfirmed { path: PathBuf },

    /// Another run switched the current installation under us
    #[error("current installation of {instance} changed during the run (expected {expected}, found {found})")]
    ConcurrentModification {
        instance: String,
        expected: String,
        found: String,
    },

    /// The release is not in the store and cannot be built here
    #[error("release {release} is not published and no build is configured")]
    ArchiveMissing { release: String },

    #[error("{description} is not handled by this action")]
    UnsupportedPayload { description: String },
}

impl ExecutionError {
    pub(crate) fn concurrent(instance: String, expected: Option<u32>, found: Option<u32>) -> Self {
        let show = |n: Option<u32>| n.map_or_else(|| "none".to_string(), |n| format!("#{}", n));
        ExecutionError::ConcurrentModification {
            instance,
            expected: show(expected),
            found: show(found),
        }
    }
}
