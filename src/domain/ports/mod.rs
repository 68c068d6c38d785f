//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod action_events;
pub mod connection;
pub mod instance_repository;
pub mod release_store;

pub use action_events::{ActionEvent, ActionEventSink, NoopEventSink, Progress};
pub use connection::{CommandOutput, Connection, ConnectionError, ConnectionResult, Endpoint};
pub use instance_repository::{InstanceRepository, RepositoryError};
pub use release_store::{ReleaseStore, StoreError};
