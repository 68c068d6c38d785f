//! Configuration module for Shipyard
//!
//! Resolution order:
//! 1. `--config <path>` (must exist)
//! 2. Project config (`./shipyard.toml`)
//! 3. User config (`<config dir>/shipyard/config.toml`)
//!
//! Environment variables (`SHIPYARD_*`) override file values.

mod loader;
mod types;

pub use loader::{
    discover, parse_with_warnings, search_paths, with_env_overrides, ConfigWarning, CONFIG_FILE,
};
pub use types::{
    BuildConfig, Config, ConnectionConfig, PolicyConfig, ReleasesConfig, ServerConfig,
    TaskConfig, DEPLOY_TASK, RELEASE_TASK,
};
