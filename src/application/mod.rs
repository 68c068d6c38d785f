//! Application Layer
//!
//! Actions that orchestrate the deployment flow.
//! This layer:
//! - Depends on Domain layer (entities, policies, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Actions
//!
//! - `DeployAction` - Install a release and activate it
//! - `RollbackAction` - Re-activate an older installation
//! - `CopySharedAction` - Copy shared folders between stages
//! - `ReleaseAction` - Build and publish a release
//!
//! All of them run through `ActionRunner`, which isolates payload failures
//! and collects them in an `ActionReport`.

mod activation;
pub mod copy_shared;
pub mod deploy;
mod failure;
pub mod release;
mod report;
pub mod rollback;
mod runner;

pub use copy_shared::{CopySharedAction, CopySharedRequest};
pub use deploy::{DeployAction, DeployRequest};
pub use failure::{ActionFailure, ExecutionError};
pub use release::{ReleaseAction, ReleaseBuilder};
pub use report::{ActionReport, ReportEntry};
pub use rollback::{RollbackAction, RollbackRequest};
pub use runner::{Action, ActionRunner};
