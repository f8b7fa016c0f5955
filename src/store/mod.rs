//! Implementations of the key-value persistence capability.

pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use disk::DiskStore;

/// Opens the disk store under the configured data directory.
pub fn open_default(config: &AppConfig) -> Result<DiskStore> {
    let path = config.default_data_path()?.join("store");
    DiskStore::open(&path)
        .with_context(|| format!("Failed to open data store at {}", path.display()))
}
