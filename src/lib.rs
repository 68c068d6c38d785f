//! Shipyard - deployment orchestrator
//!
//! Shipyard installs releases onto instances (a server, an environment and a
//! stage), rolls them back and copies shared data between stages. Every
//! mutating operation passes a configurable set of policies first, and one
//! failing instance never blocks the others.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{Action, ActionFailure, ActionReport, ActionRunner};
pub use config::Config;
pub use domain::entities::{Installation, Instance, Release};
pub use domain::value_objects::Filter;
pub use error::{ConfigError, ShipyardError, ShipyardResult};
