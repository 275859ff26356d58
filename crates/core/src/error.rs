//! Error types for table and row operations.
//!
//! These are the only errors the CRUD surface produces. Persistence errors
//! live in the durability crate and never reach the request path.

use thiserror::Error;

/// Result type for table and row operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors returned by the database CRUD surface.
///
/// All variants are recoverable: repositories map them to their own
/// "no such user" style errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The operation referenced a table that was never created (or was dropped).
    #[error("no such table: {table}")]
    TableNotFound {
        /// Name of the missing table
        table: String,
    },

    /// The operation required an existing row.
    #[error("no such row: {id} in table {table}")]
    RowNotFound {
        /// Table that was searched
        table: String,
        /// Identifier that was not present
        id: String,
    },

    /// A rename targeted a name that is already registered.
    #[error("table already exists: {table}")]
    TableExists {
        /// Name that is already taken
        table: String,
    },
}

impl StoreError {
    /// Build a `TableNotFound` error.
    pub fn table_not_found(table: impl Into<String>) -> Self {
        StoreError::TableNotFound {
            table: table.into(),
        }
    }

    /// Build a `RowNotFound` error.
    pub fn row_not_found(table: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::RowNotFound {
            table: table.into(),
            id: id.into(),
        }
    }

    /// Check if this is any not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::TableNotFound { .. } | StoreError::RowNotFound { .. }
        )
    }

    /// Check if this is a missing table.
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, StoreError::TableNotFound { .. })
    }

    /// Check if this is a missing row.
    pub fn is_row_not_found(&self) -> bool {
        matches!(self, StoreError::RowNotFound { .. })
    }
}
