//! Domain Layer
//!
//! The deployment model and the rules around it, free of transport details.
//!
//! ## Structure
//!
//! - `entities/` - Instance, Installation, Release, Payload
//! - `value_objects/` - Filter, StageLayers
//! - `policies/` - Policy kinds and the engine that evaluates them
//! - `ports/` - Interface definitions for infrastructure

pub mod entities;
pub mod policies;
pub mod ports;
pub mod value_objects;
