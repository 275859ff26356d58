//! Main entry point for rowstore.
//!
//! This module provides the `RowStore` struct, which opens a database
//! (restoring the last snapshot when configured), exposes its CRUD surface,
//! and wires the shutdown snapshot.

use crate::error::Result;
use rowstore_core::Row;
use rowstore_durability::{write_snapshot, SnapshotReport};
use rowstore_engine::{open_database, LifecycleController, Recovery, ShutdownHandle, StoreConfig};
use rowstore_storage::Database;
use std::future::Future;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// An opened table store.
///
/// Dereferences to [`Database`], so every CRUD operation is available
/// directly on the store. Clone the [`db`](RowStore::db) handle to share the
/// database with repositories.
///
/// # Example
///
/// ```ignore
/// use rowstore::prelude::*;
///
/// let store: RowStore<JsonRow> = RowStore::builder()
///     .snapshot_path("state/db.snap")
///     .table("users")
///     .open()?;
///
/// store.add_row("users", "1", json!({"name": "a"}))?;
///
/// let handle = store.on_shutdown(shutdown_signal());
/// // ... serve ...
/// handle.wait().await?;
/// ```
pub struct RowStore<R> {
    db: Arc<Database<R>>,
    config: StoreConfig,
    recovery: Recovery,
}

impl<R: Row> RowStore<R> {
    /// Open a store persisting to `path`, restoring it if it exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        RowStoreBuilder::new().snapshot_path(path).open()
    }

    /// Create a store with no snapshot file.
    ///
    /// Data is lost when the process exits.
    pub fn ephemeral() -> Self {
        RowStore {
            db: Arc::new(Database::new()),
            config: StoreConfig::ephemeral(),
            recovery: Recovery::Fresh,
        }
    }

    /// Open a store from a loaded config.
    pub fn from_config(config: StoreConfig) -> Result<Self> {
        let (db, recovery) = open_database(&config)?;
        info!(?recovery, tables = db.table_names().len(), "opened store");
        Ok(RowStore {
            db: Arc::new(db),
            config,
            recovery,
        })
    }

    /// Shared handle to the database
    pub fn db(&self) -> &Arc<Database<R>> {
        &self.db
    }

    /// How the content was obtained at open
    pub fn recovery(&self) -> &Recovery {
        &self.recovery
    }

    /// The config the store was opened with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Snapshot file location, if persistent
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.config.snapshot_path.as_deref()
    }

    /// Check if the store has no snapshot file
    pub fn is_ephemeral(&self) -> bool {
        self.config.snapshot_path.is_none()
    }

    /// Write a snapshot immediately.
    ///
    /// Returns `None` for ephemeral stores. Blocks on file I/O.
    pub fn snapshot_now(&self) -> Result<Option<SnapshotReport>> {
        match self.snapshot_path() {
            None => Ok(None),
            Some(path) => Ok(Some(write_snapshot(&self.db, path)?)),
        }
    }

    /// Write one snapshot when `signal` resolves.
    ///
    /// The owning process must wait on the returned handle before exiting.
    /// When persistence or `snapshot_on_shutdown` is off, the handle still
    /// completes, with [`ShutdownOutcome::Skipped`](rowstore_engine::ShutdownOutcome::Skipped).
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_shutdown<F>(&self, signal: F) -> ShutdownHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.config.shutdown_path() {
            Some(path) => LifecycleController::spawn(Arc::clone(&self.db), path, signal),
            None => LifecycleController::spawn_disabled(signal),
        }
    }
}

impl RowStore<()> {
    /// Create a builder for store configuration.
    ///
    /// The row type is chosen by [`RowStoreBuilder::open`].
    pub fn builder() -> RowStoreBuilder {
        RowStoreBuilder::new()
    }
}

impl<R> std::fmt::Debug for RowStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStore")
            .field("db", &self.db)
            .field("config", &self.config)
            .field("recovery", &self.recovery)
            .finish()
    }
}

impl<R> Deref for RowStore<R> {
    type Target = Database<R>;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Builder for store configuration.
///
/// # Example
///
/// ```ignore
/// // Production: restore on open, snapshot on shutdown
/// let store: RowStore<Entity> = RowStore::builder()
///     .snapshot_path("state/db.snap")
///     .tables(["users", "public_messages", "private_messages"])
///     .open()?;
///
/// // Tests: nothing touches disk
/// let store: RowStore<Entity> = RowStore::builder().ephemeral().open()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RowStoreBuilder {
    config: StoreConfig,
}

impl RowStoreBuilder {
    /// Create a builder with default settings (ephemeral).
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded config.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Persist to `path`.
    pub fn snapshot_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.snapshot_path = Some(PathBuf::from(path.as_ref()));
        self
    }

    /// Do not persist anything.
    pub fn ephemeral(mut self) -> Self {
        self.config.snapshot_path = None;
        self
    }

    /// Whether to load the snapshot when opening (default: true).
    pub fn restore_on_open(mut self, enabled: bool) -> Self {
        self.config.restore_on_open = enabled;
        self
    }

    /// Whether to write a snapshot on shutdown (default: true).
    pub fn snapshot_on_shutdown(mut self, enabled: bool) -> Self {
        self.config.snapshot_on_shutdown = enabled;
        self
    }

    /// Ensure a table exists after opening.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.config.tables.push(name.into());
        self
    }

    /// Ensure several tables exist after opening.
    pub fn tables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.tables.extend(names.into_iter().map(Into::into));
        self
    }

    /// Open the store.
    pub fn open<R: Row>(self) -> Result<RowStore<R>> {
        RowStore::from_config(self.config)
    }
}
