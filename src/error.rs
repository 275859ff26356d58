//! Unified error types for rowstore.
//!
//! This module provides a clean error type that wraps the per-layer errors
//! and presents a consistent interface to users.

use rowstore_core::StoreError;
use rowstore_durability::SnapshotError;
use rowstore_engine::{ConfigError, LifecycleError};
use std::path::PathBuf;
use thiserror::Error;

/// All rowstore errors.
///
/// Repositories only ever see the not-found variants from CRUD calls;
/// the persistence variants come from opening, snapshotting and shutdown.
#[derive(Debug, Error)]
pub enum Error {
    /// Table is not registered
    #[error("no such table: {0}")]
    TableNotFound(String),

    /// Row is not present in the table
    #[error("no such row: {id} in table {table}")]
    RowNotFound {
        /// Table that was searched
        table: String,
        /// Missing identifier
        id: String,
    },

    /// Table name is already taken
    #[error("table already exists: {0}")]
    TableExists(String),

    /// No snapshot at the given location
    #[error("no snapshot at {}", .0.display())]
    SnapshotNotFound(PathBuf),

    /// Snapshot could not be decoded or encoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration
    #[error("config error: {0}")]
    Config(String),

    /// Shutdown controller failed before reporting a snapshot outcome
    #[error("lifecycle error: {0}")]
    Lifecycle(String),
}

/// Result type for rowstore operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a missing table or row.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::TableNotFound(_) | Error::RowNotFound { .. })
    }

    /// Check if this is a missing table.
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, Error::TableNotFound(_))
    }

    /// Check if this is a missing row.
    pub fn is_row_not_found(&self) -> bool {
        matches!(self, Error::RowNotFound { .. })
    }

    /// Check if this came from snapshotting or restore rather than the CRUD surface.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Error::SnapshotNotFound(_)
                | Error::Serialization(_)
                | Error::Io(_)
                | Error::Lifecycle(_)
        )
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::TableNotFound { table } => Error::TableNotFound(table),
            StoreError::RowNotFound { table, id } => Error::RowNotFound { table, id },
            StoreError::TableExists { table } => Error::TableExists(table),
        }
    }
}

impl From<SnapshotError> for Error {
    fn from(e: SnapshotError) -> Self {
        match e {
            SnapshotError::NotFound { path } => Error::SnapshotNotFound(path),
            SnapshotError::Io(io_err) => Error::Io(io_err),
            other => Error::Serialization(other.to_string()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<LifecycleError> for Error {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::Snapshot(inner) => inner.into(),
            other => Error::Lifecycle(other.to_string()),
        }
    }
}
