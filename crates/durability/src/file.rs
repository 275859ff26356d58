//! Snapshot files on disk.
//!
//! Writes go to a uniquely named temp file in the target's directory, which
//! is fsynced and then renamed over the target. Readers therefore see either
//! the previous snapshot or the new one, never a partial file. Concurrent
//! writers to the same path never share a temp file; the last rename wins.

use crate::error::{Result, SnapshotError};
use crate::format::{encode, restore};
use chrono::Utc;
use rowstore_core::Row;
use rowstore_storage::{Database, DatabaseImage};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Outcome of a successful snapshot write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotReport {
    /// Where the snapshot was written
    pub path: PathBuf,
    /// Tables written
    pub tables: usize,
    /// Rows written across all tables
    pub rows: usize,
    /// Size of the snapshot file
    pub bytes: u64,
    /// Time spent encoding and writing
    pub elapsed: Duration,
}

/// Snapshot a database to `path`.
///
/// The database is read-locked only while its image is copied.
pub fn write_snapshot<R: Row>(db: &Database<R>, path: &Path) -> Result<SnapshotReport> {
    write_image(&db.image(), path)
}

/// Write an already-copied image to `path`
pub fn write_image<R: Row>(image: &DatabaseImage<R>, path: &Path) -> Result<SnapshotReport> {
    let start = Instant::now();
    let bytes = encode(image, Utc::now())?;

    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            dir
        }
        None => Path::new("."),
    };

    // Dropping the temp file on any error removes it
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| SnapshotError::Io(e.error))?;

    // The new snapshot is already in place; a failed directory sync only
    // weakens durability of the rename
    sync_parent(dir);

    let report = SnapshotReport {
        path: path.to_path_buf(),
        tables: image.table_count(),
        rows: image.row_count(),
        bytes: bytes.len() as u64,
        elapsed: start.elapsed(),
    };

    info!(
        path = %report.path.display(),
        tables = report.tables,
        rows = report.rows,
        bytes = report.bytes,
        "snapshot written"
    );

    Ok(report)
}

/// Read and restore the snapshot at `path`.
///
/// A missing file is [`SnapshotError::NotFound`].
pub fn read_snapshot<R: Row>(path: &Path) -> Result<Database<R>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SnapshotError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(SnapshotError::Io(e)),
    };

    debug!(path = %path.display(), bytes = bytes.len(), "read snapshot");
    restore(&bytes)
}

fn sync_parent(dir: &Path) {
    if let Err(e) = sync_dir(dir) {
        warn!(dir = %dir.display(), error = %e, "failed to sync snapshot directory");
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
