//! Store configuration.
//!
//! ```toml
//! snapshot_path = "state/db.snap"
//! restore_on_open = true
//! snapshot_on_shutdown = true
//! tables = ["users", "public_messages", "private_messages"]
//! ```
//!
//! Every key is optional. Without `snapshot_path` the store is ephemeral.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a store is opened and persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Snapshot file; `None` disables persistence
    pub snapshot_path: Option<PathBuf>,
    /// Load the snapshot (if any) when opening
    pub restore_on_open: bool,
    /// Write a snapshot when the shutdown signal fires
    pub snapshot_on_shutdown: bool,
    /// Tables ensured to exist after opening
    pub tables: Vec<String>,
}

impl StoreConfig {
    /// Config with no snapshot file
    pub fn ephemeral() -> Self {
        Self::default()
    }

    /// Config persisting to `path`
    pub fn with_snapshot_path(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            snapshot_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check values that TOML cannot express as types
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.snapshot_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("snapshot_path is empty".to_string()));
            }
        }
        if let Some(name) = self.tables.iter().find(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "table name {:?} is blank",
                name
            )));
        }
        Ok(())
    }

    /// Snapshot file to load on open, if restoring is enabled
    pub fn restore_path(&self) -> Option<&Path> {
        self.snapshot_path
            .as_deref()
            .filter(|_| self.restore_on_open)
    }

    /// Snapshot file to write on shutdown, if saving is enabled
    pub fn shutdown_path(&self) -> Option<&Path> {
        self.snapshot_path
            .as_deref()
            .filter(|_| self.snapshot_on_shutdown)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            snapshot_path: None,
            restore_on_open: true,
            snapshot_on_shutdown: true,
            tables: Vec::new(),
        }
    }
}
