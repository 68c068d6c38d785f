//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `command_builder` - Shell command text for host operations
//! - `connection/` - Connection implementations (Local, Remote)
//! - `repositories/` - Instance state read from server filesystems
//! - `release_store` - Packaged releases on local disk
//! - `events/` - Action event sinks (tracing, NDJSON)

pub mod command_builder;
pub mod connection;
pub mod events;
pub mod release_store;
pub mod repositories;

// Re-export for convenience
pub use command_builder::CommandBuilder;
pub use connection::{LocalConnection, RemoteConnection};
pub use events::{JsonEventSink, TracingEventSink};
pub use release_store::FolderReleaseStore;
pub use repositories::{ConnectionInstanceRepository, ServerLayout};
