//! Command implementations for the hotelbook CLI

pub mod config;
pub mod migrate;
pub mod serve;

use std::path::Path;

use anyhow::{Context, Result};
use hotelbook_server::HostConfig;

pub use config::run_config;
pub use migrate::run_migrate;
pub use serve::run_serve;

/// Load the host configuration, naming the file on failure.
pub(crate) fn load_config(path: &Path) -> Result<HostConfig> {
    HostConfig::load(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}
