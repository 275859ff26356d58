//! The table directory and its CRUD surface
//!
//! `Database` owns every table and guards the whole directory with one
//! `parking_lot::RwLock`:
//!
//! | Operation | Lock |
//! |-----------|------|
//! | get_table, get_row, get_all_rows, get_row_count, table_counter, image | read |
//! | create_table, recreate_table, rename_table, drop_table | write |
//! | add_row, alter_row, drop_row, clear | write |
//!
//! Every call takes the lock once and releases it before returning, so the
//! calls are linearizable. Sequences of calls are not atomic: a caller that
//! checks for a row and then adds it needs its own lock around the pair.
//!
//! No operation here performs I/O. Snapshots copy an [`DatabaseImage`] out
//! under the read lock and serialize it after the lock is released.

use crate::image::{DatabaseImage, ImageError};
use crate::table::Table;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use rowstore_core::{JsonRow, Page, Result, StoreError};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Shared read access to one table.
///
/// Holds the database read lock while alive; writers wait until it is dropped.
pub type TableRef<'a, R> = MappedRwLockReadGuard<'a, Table<R>>;

/// A database of opaque JSON rows
pub type JsonDatabase = Database<JsonRow>;

/// Row counts for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    /// Table name
    pub name: String,
    /// Rows currently present
    pub rows: usize,
    /// Distinct ids ever inserted
    pub inserted: u64,
}

/// In-memory table store.
///
/// # Example
///
/// ```ignore
/// use rowstore_storage::Database;
/// use rowstore_core::Page;
///
/// let db: Database<String> = Database::new();
/// db.create_table("users");
/// db.add_row("users", "1", "alice".to_string())?;
/// let page = db.get_all_rows("users", Page::new(0, 10))?;
/// ```
pub struct Database<R> {
    tables: RwLock<BTreeMap<String, Table<R>>>,
}

impl<R> Database<R> {
    /// Create an empty database
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(BTreeMap::new()),
        }
    }

    // ========================================================================
    // Table lifecycle
    // ========================================================================

    /// Ensure a table named `name` exists.
    ///
    /// Creating a table that already exists leaves it and its rows untouched.
    /// Returns `true` if a new table was registered.
    pub fn create_table(&self, name: &str) -> bool {
        let mut tables = self.tables.write();
        if tables.contains_key(name) {
            debug!(table = name, "table already exists");
            return false;
        }
        tables.insert(name.to_string(), Table::new());
        info!(table = name, "created table");
        true
    }

    /// Register an empty table under `name`, discarding any existing one.
    ///
    /// Returns `true` if an existing table was replaced.
    pub fn recreate_table(&self, name: &str) -> bool {
        let replaced = self
            .tables
            .write()
            .insert(name.to_string(), Table::new())
            .is_some();
        info!(table = name, replaced, "recreated table");
        replaced
    }

    /// Read access to a table.
    ///
    /// The returned handle keeps the database read-locked until dropped.
    pub fn get_table(&self, name: &str) -> Result<TableRef<'_, R>> {
        RwLockReadGuard::try_map(self.tables.read(), |tables| tables.get(name))
            .map_err(|_| StoreError::table_not_found(name))
    }

    /// Check if a table is registered
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    /// Names of all registered tables, sorted
    pub fn table_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    /// Rename a table, keeping its rows and counter.
    pub fn rename_table(&self, from: &str, to: &str) -> Result<()> {
        let mut tables = self.tables.write();
        if !tables.contains_key(from) {
            return Err(StoreError::table_not_found(from));
        }
        if from == to {
            return Ok(());
        }
        if tables.contains_key(to) {
            return Err(StoreError::TableExists {
                table: to.to_string(),
            });
        }
        if let Some(table) = tables.remove(from) {
            tables.insert(to.to_string(), table);
        }
        info!(from, to, "renamed table");
        Ok(())
    }

    /// Remove a table and all of its rows.
    ///
    /// Dropping an unregistered table is a no-op. Returns `true` if a table
    /// was removed.
    pub fn drop_table(&self, name: &str) -> bool {
        let dropped = self.tables.write().remove(name).is_some();
        if dropped {
            info!(table = name, "dropped table");
        }
        dropped
    }

    /// Discard every table and row.
    ///
    /// Intended for test setup.
    pub fn clear(&self) {
        let mut tables = self.tables.write();
        let count = tables.len();
        tables.clear();
        info!(tables = count, "cleared database");
    }

    // ========================================================================
    // Row operations
    // ========================================================================

    /// Insert a row, or silently overwrite the row already under `id`.
    ///
    /// Overwriting keeps the row's insertion position.
    pub fn add_row(&self, table: &str, id: &str, row: R) -> Result<()> {
        let mut tables = self.tables.write();
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::table_not_found(table))?;
        t.set(id, row);
        Ok(())
    }

    /// Replace an existing row.
    ///
    /// Unlike [`add_row`](Self::add_row), this never creates a row.
    pub fn alter_row(&self, table: &str, id: &str, row: R) -> Result<()> {
        let mut tables = self.tables.write();
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::table_not_found(table))?;
        let slot = t
            .get_mut(id)
            .ok_or_else(|| StoreError::row_not_found(table, id))?;
        *slot = row;
        Ok(())
    }

    /// Remove a row. Removing a missing row is a no-op.
    ///
    /// Returns `true` if a row was removed.
    pub fn drop_row(&self, table: &str, id: &str) -> Result<bool> {
        let mut tables = self.tables.write();
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::table_not_found(table))?;
        Ok(t.delete(id).is_some())
    }

    /// Check if a row exists
    pub fn contains_row(&self, table: &str, id: &str) -> Result<bool> {
        Ok(self.get_table(table)?.contains(id))
    }

    /// Number of rows in a table
    pub fn get_row_count(&self, table: &str) -> Result<usize> {
        Ok(self.get_table(table)?.len())
    }

    /// Distinct ids ever inserted into a table.
    ///
    /// Survives deletes and snapshots, so `table_counter + 1` is a safe next
    /// numeric id for tables keyed by sequential integers.
    pub fn table_counter(&self, table: &str) -> Result<u64> {
        Ok(self.get_table(table)?.inserted())
    }

    /// Row counts for every table, sorted by name
    pub fn stats(&self) -> Vec<TableStats> {
        self.tables
            .read()
            .iter()
            .map(|(name, table)| TableStats {
                name: name.clone(),
                rows: table.len(),
                inserted: table.inserted(),
            })
            .collect()
    }
}

impl<R: Clone> Database<R> {
    /// Get a copy of one row
    pub fn get_row(&self, table: &str, id: &str) -> Result<R> {
        let t = self.get_table(table)?;
        t.get(id)
            .cloned()
            .ok_or_else(|| StoreError::row_not_found(table, id))
    }

    /// Copy the rows inside `page`, in insertion order.
    ///
    /// The returned rows are detached from the table; later writes do not
    /// affect them.
    pub fn get_all_rows(&self, table: &str, page: Page) -> Result<Vec<R>> {
        Ok(self.get_table(table)?.rows(page))
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// Copy the whole directory.
    ///
    /// The read lock is held only for the copy.
    pub fn image(&self) -> DatabaseImage<R> {
        let tables = self.tables.read();
        DatabaseImage {
            tables: tables
                .iter()
                .map(|(name, table)| (name.clone(), table.to_image()))
                .collect(),
        }
    }
}

impl<R> Database<R> {
    /// Rebuild a database from an image.
    ///
    /// Fails without building anything if any table image is inconsistent.
    pub fn from_image(image: DatabaseImage<R>) -> std::result::Result<Self, ImageError> {
        let mut tables = BTreeMap::new();
        for (name, table) in image.tables {
            let table = Table::from_image(&name, table)?;
            tables.insert(name, table);
        }
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }
}

impl<R> Default for Database<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> std::fmt::Debug for Database<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("tables", &self.table_names())
            .finish()
    }
}
