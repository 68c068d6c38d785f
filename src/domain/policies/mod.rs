//! Domain Policies
//!
//! Rules that gate every mutating payload. Policies are a closed set of
//! kinds evaluated by a single dispatcher.

mod engine;
mod policy;

pub use engine::{PolicyDenial, PolicyEngine, Verdict};
pub use policy::{Policy, PolicyKind};
