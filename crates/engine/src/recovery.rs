//! Startup recovery.
//!
//! ## Recovery Sequence
//!
//! 1. If restoring is enabled, read the snapshot at the configured path
//! 2. Missing snapshot: start empty (`Fresh`)
//! 3. Undecodable or unreadable snapshot: log, start empty (`Discarded`)
//! 4. Ensure every configured table exists
//!
//! A failed restore never yields partial state. The process always starts
//! with a usable database.

use crate::config::StoreConfig;
use crate::error::ConfigError;
use rowstore_core::Row;
use rowstore_durability::read_snapshot;
use rowstore_storage::Database;
use tracing::{info, warn};

/// How the database content was obtained at open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// No snapshot was configured or found
    Fresh,
    /// Content was restored from the snapshot
    Restored {
        /// Tables restored
        tables: usize,
        /// Rows restored across all tables
        rows: usize,
    },
    /// A snapshot existed but was unusable; the database started empty
    Discarded {
        /// Why the snapshot was rejected
        reason: String,
    },
}

impl Recovery {
    /// Check if content came from a snapshot
    pub fn is_restored(&self) -> bool {
        matches!(self, Recovery::Restored { .. })
    }
}

/// Open a database according to `config`.
///
/// Only an invalid config is an error; snapshot problems degrade to an
/// empty database and are reported through [`Recovery`].
pub fn open_database<R: Row>(
    config: &StoreConfig,
) -> Result<(Database<R>, Recovery), ConfigError> {
    config.validate()?;

    let (db, recovery) = match config.restore_path() {
        None => (Database::new(), Recovery::Fresh),
        Some(path) => match read_snapshot::<R>(path) {
            Ok(db) => {
                let stats = db.stats();
                let recovery = Recovery::Restored {
                    tables: stats.len(),
                    rows: stats.iter().map(|t| t.rows).sum(),
                };
                info!(path = %path.display(), ?recovery, "restored database from snapshot");
                (db, recovery)
            }
            Err(e) if e.is_not_found() => {
                info!(path = %path.display(), "no snapshot found, starting empty");
                (Database::new(), Recovery::Fresh)
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "discarding unusable snapshot, starting empty"
                );
                (
                    Database::new(),
                    Recovery::Discarded {
                        reason: e.to_string(),
                    },
                )
            }
        },
    };

    for table in &config.tables {
        db.create_table(table);
    }

    Ok((db, recovery))
}
