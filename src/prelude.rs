//! Convenient imports for Rowstore.
//!
//! ```ignore
//! use rowstore::prelude::*;
//!
//! let store: RowStore<JsonRow> = RowStore::ephemeral();
//! store.create_table("users");
//! store.add_row("users", "1", json!({"name": "Alice"}))?;
//! ```

// Main entry point
pub use crate::store::{RowStore, RowStoreBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Core types
pub use rowstore_core::{JsonRow, Page, Row};

// Storage
pub use rowstore_storage::Database;

// Lifecycle
pub use rowstore_engine::{shutdown_signal, ShutdownHandle, ShutdownOutcome, StoreConfig};

// Re-export serde_json for convenience
pub use serde_json::json;
