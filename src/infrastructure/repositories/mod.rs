//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod instance;

pub use instance::{ConnectionInstanceRepository, ServerLayout, INSTALLATION_METADATA};
