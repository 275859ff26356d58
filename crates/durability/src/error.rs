//! Snapshot errors

use rowstore_storage::ImageError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for snapshot operations.
pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Errors raised while writing or restoring a snapshot.
///
/// None of these affect the live database: a failed write loses durability,
/// a failed restore means starting empty.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// No snapshot exists at the location. Not fatal: start empty.
    #[error("no snapshot at {}", path.display())]
    NotFound {
        /// Location that was read
        path: PathBuf,
    },

    /// Snapshot bytes are malformed, truncated, or corrupt
    #[error("snapshot decode error: {0}")]
    Decode(String),

    /// Snapshot was written by an unknown format version
    #[error("unsupported snapshot version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version found in the header
        found: u32,
        /// Version this build reads
        supported: u32,
    },

    /// Snapshot decoded but describes an impossible database
    #[error("snapshot content is inconsistent: {0}")]
    Image(#[from] ImageError),

    /// Rows could not be encoded
    #[error("snapshot encode error: {0}")]
    Encode(String),

    /// Durable read or write failed
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SnapshotError {
    /// Check if no snapshot was found
    pub fn is_not_found(&self) -> bool {
        matches!(self, SnapshotError::NotFound { .. })
    }

    /// Check if the snapshot exists but could not be decoded
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            SnapshotError::Decode(_)
                | SnapshotError::UnsupportedVersion { .. }
                | SnapshotError::Image(_)
        )
    }

    /// Check if durable storage failed
    pub fn is_io(&self) -> bool {
        matches!(self, SnapshotError::Io(_))
    }
}
