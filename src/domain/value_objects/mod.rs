//! Value objects - immutable selection and configuration values

mod filter;
mod stage_layers;

pub use filter::{Filter, FilterError};
pub use stage_layers::StageLayers;
