//! Owned images of database content.
//!
//! An image is a plain, lock-free copy of the directory. Snapshots are taken
//! by cloning an image under a brief read lock and serializing it after the
//! lock is released; restore goes the other way.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// One row with its id and insertion sequence stamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowImage<R> {
    /// Row identifier, unique within the table
    pub id: String,
    /// Insertion sequence stamp
    pub seq: u64,
    /// The row value
    pub row: R,
}

/// Owned copy of one table.
///
/// `rows` is in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableImage<R> {
    /// Distinct ids ever inserted into the table
    pub inserted: u64,
    /// Surviving rows, oldest first
    pub rows: Vec<RowImage<R>>,
}

impl<R> Default for TableImage<R> {
    fn default() -> Self {
        TableImage {
            inserted: 0,
            rows: Vec::new(),
        }
    }
}

/// Owned copy of every table, keyed by table name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseImage<R> {
    /// Tables by name
    pub tables: BTreeMap<String, TableImage<R>>,
}

impl<R> DatabaseImage<R> {
    /// An image with no tables
    pub fn empty() -> Self {
        DatabaseImage {
            tables: BTreeMap::new(),
        }
    }

    /// Number of tables in the image
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of rows across all tables
    pub fn row_count(&self) -> usize {
        self.tables.values().map(|table| table.rows.len()).sum()
    }
}

impl<R> Default for DatabaseImage<R> {
    fn default() -> Self {
        Self::empty()
    }
}

/// An image that does not describe a reachable database state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// The same id appears twice in one table
    #[error("duplicate row {id} in table {table}")]
    DuplicateRow {
        /// Table name
        table: String,
        /// Repeated id
        id: String,
    },

    /// Sequence stamps are not strictly increasing
    #[error("row {id} in table {table} is out of insertion order")]
    SequenceOrder {
        /// Table name
        table: String,
        /// First row found out of order
        id: String,
    },

    /// A row's sequence stamp is not below the table's insertion counter
    #[error("table {table} counter {inserted} is behind row sequence {seq}")]
    CounterBehind {
        /// Table name
        table: String,
        /// Recorded insertion counter
        inserted: u64,
        /// Offending sequence stamp
        seq: u64,
    },
}
