//! Durability layer for rowstore
//!
//! This crate implements whole-database snapshots:
//! - Snapshot file format: header line (magic, version, CRC32, length) + JSON body
//! - serialize / restore between a `Database` and snapshot bytes
//! - write_snapshot: temp file + fsync + rename, so a crash mid-write keeps
//!   the previous snapshot intact
//! - read_snapshot: a missing file is `NotFound`, not an I/O failure
//!
//! There is no write-ahead log. The snapshot is the only persisted state.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod file;
pub mod format;

pub use error::{Result, SnapshotError};
pub use file::{read_snapshot, write_image, write_snapshot, SnapshotReport};
pub use format::{decode, encode, restore, serialize, Snapshot, FORMAT_VERSION, MAGIC};
