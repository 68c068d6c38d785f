//! Presentation Layer
//!
//! This layer handles:
//! - Creating actions with infrastructure dependencies
//! - Output formatting (text/JSON)
//!
//! ## Structure
//!
//! - `factory` - Creates actions with proper dependencies (dependency injection)
//! - `output` - Report rendering

pub mod factory;
pub mod output;

pub use output::{create_renderer, format_warning, OutputFormat, ReportRenderer};
