//! # Rowstore
//!
//! Embedded in-memory table store with shutdown snapshots.
//!
//! Rowstore keeps named tables of rows addressed by string ids, safe to use
//! from many threads at once. On a graceful shutdown it writes one snapshot
//! of every table to disk, and the next start restores from it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use rowstore::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> rowstore::Result<()> {
//!     let store: RowStore<JsonRow> = RowStore::builder()
//!         .snapshot_path("state/db.snap")
//!         .tables(["users", "public_messages"])
//!         .open()?;
//!
//!     store.add_row("users", "42", json!({"name": "Alice"}))?;
//!     let user = store.get_row("users", "42")?;
//!
//!     // Write the snapshot when Ctrl-C or SIGTERM arrives
//!     let shutdown = store.on_shutdown(shutdown_signal());
//!     // ... serve ...
//!     shutdown.wait().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - `rowstore-core`: error, row bound and pagination types
//! - `rowstore-storage`: [`Table`] and [`Database`]
//! - `rowstore-durability`: snapshot format and files
//! - `rowstore-engine`: config, recovery and the shutdown lifecycle
//!
//! Row types are any `Clone + Serialize + DeserializeOwned` value; use
//! [`JsonRow`] when a store holds mixed shapes.

#![warn(missing_docs)]

mod error;
mod store;

pub mod prelude;

// Re-export main entry points
pub use error::{Error, Result};
pub use store::{RowStore, RowStoreBuilder};

// Re-export layer types
pub use rowstore_core::{JsonRow, Page, Row, StoreError};
pub use rowstore_durability::{
    read_snapshot, restore, serialize, write_snapshot, SnapshotError, SnapshotReport,
    FORMAT_VERSION,
};
pub use rowstore_engine::{
    open_database, shutdown_signal, ConfigError, LifecycleController, LifecycleError,
    LifecycleState, Recovery, ShutdownHandle, ShutdownOutcome, ShutdownResult, StoreConfig,
};
pub use rowstore_storage::{Database, JsonDatabase, Table, TableRef, TableStats};
