//! Snapshot file format
//!
//! ```text
//! ROWSTORE-SNAPSHOT <version> <crc32 hex> <body length>\n
//! {"created_at":"...","tables":{"users":{"inserted":3,"rows":[{"id":"1","seq":0,"row":...}]}}}
//! ```
//!
//! The header line lets a reader reject truncated or corrupted files before
//! parsing the body. The body is JSON; each table's `rows` array is in
//! insertion order, so restoring it reproduces pagination order exactly.

use crate::error::{Result, SnapshotError};
use chrono::{DateTime, Utc};
use rowstore_core::Row;
use rowstore_storage::{Database, DatabaseImage, TableImage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// First token of every snapshot file
pub const MAGIC: &str = "ROWSTORE-SNAPSHOT";

/// Format version written by this build
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct BodyRef<'a, R> {
    created_at: DateTime<Utc>,
    tables: &'a BTreeMap<String, TableImage<R>>,
}

#[derive(Deserialize)]
struct Body<R> {
    created_at: DateTime<Utc>,
    tables: BTreeMap<String, TableImage<R>>,
}

/// A decoded snapshot
#[derive(Debug, Clone)]
pub struct Snapshot<R> {
    /// When the snapshot was taken
    pub created_at: DateTime<Utc>,
    /// The database content
    pub image: DatabaseImage<R>,
}

/// Encode an image into snapshot bytes
pub fn encode<R: Row>(image: &DatabaseImage<R>, created_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(&BodyRef {
        created_at,
        tables: &image.tables,
    })
    .map_err(|e| SnapshotError::Encode(e.to_string()))?;

    let header = format!(
        "{} {} {:08x} {}\n",
        MAGIC,
        FORMAT_VERSION,
        crc32fast::hash(&body),
        body.len()
    );

    let mut bytes = Vec::with_capacity(header.len() + body.len());
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decode snapshot bytes, verifying header, length and checksum
pub fn decode<R: Row>(bytes: &[u8]) -> Result<Snapshot<R>> {
    let newline = bytes
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| SnapshotError::Decode("missing header line".to_string()))?;
    let header = std::str::from_utf8(&bytes[..newline])
        .map_err(|_| SnapshotError::Decode("header is not UTF-8".to_string()))?;
    let body = &bytes[newline + 1..];

    let mut fields = header.split_whitespace();
    if fields.next() != Some(MAGIC) {
        return Err(SnapshotError::Decode("not a rowstore snapshot".to_string()));
    }

    let version: u32 = parse_field(fields.next(), "version", |s| s.parse().ok())?;
    if version != FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: version,
            supported: FORMAT_VERSION,
        });
    }

    let checksum: u32 = parse_field(fields.next(), "checksum", |s| {
        u32::from_str_radix(s, 16).ok()
    })?;
    let length: usize = parse_field(fields.next(), "length", |s| s.parse().ok())?;
    if fields.next().is_some() {
        return Err(SnapshotError::Decode("trailing header fields".to_string()));
    }

    if body.len() != length {
        return Err(SnapshotError::Decode(format!(
            "body length {} does not match header length {}",
            body.len(),
            length
        )));
    }

    let actual = crc32fast::hash(body);
    if actual != checksum {
        return Err(SnapshotError::Decode(format!(
            "checksum mismatch: header {:08x}, body {:08x}",
            checksum, actual
        )));
    }

    let body: Body<R> =
        serde_json::from_slice(body).map_err(|e| SnapshotError::Decode(e.to_string()))?;

    Ok(Snapshot {
        created_at: body.created_at,
        image: DatabaseImage {
            tables: body.tables,
        },
    })
}

fn parse_field<T>(
    field: Option<&str>,
    name: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T> {
    field
        .and_then(parse)
        .ok_or_else(|| SnapshotError::Decode(format!("bad header field: {}", name)))
}

/// Serialize every table and row of a database.
///
/// The directory is copied under a brief read lock; encoding happens after
/// the lock is released.
pub fn serialize<R: Row>(db: &Database<R>) -> Result<Vec<u8>> {
    encode(&db.image(), Utc::now())
}

/// Rebuild a database from snapshot bytes.
///
/// Either the whole database is rebuilt or an error is returned; partial
/// state is never produced.
pub fn restore<R: Row>(bytes: &[u8]) -> Result<Database<R>> {
    let snapshot = decode(bytes)?;
    Ok(Database::from_image(snapshot.image)?)
}
