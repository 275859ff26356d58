//! Engine errors

use rowstore_durability::SnapshotError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration could not be loaded or is invalid
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// Config file location
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for `StoreConfig`
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config values are inconsistent
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// The shutdown snapshot did not complete successfully
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Writing the snapshot failed
    #[error("shutdown snapshot failed: {0}")]
    Snapshot(#[from] SnapshotError),

    /// The blocking snapshot task panicked or was cancelled
    #[error("snapshot task failed: {0}")]
    Task(String),

    /// The controller went away without reporting an outcome
    #[error("lifecycle controller stopped before reporting")]
    Abandoned,
}
