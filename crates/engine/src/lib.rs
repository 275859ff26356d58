//! Engine layer for rowstore
//!
//! Binds the in-memory database to the process lifecycle:
//! - `StoreConfig`: snapshot location and open/shutdown behavior (TOML)
//! - `open_database`: restore from the last snapshot or start empty
//! - `LifecycleController`: write exactly one snapshot when the shutdown
//!   signal fires and report the outcome through a one-shot completion

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod recovery;

pub use config::StoreConfig;
pub use error::{ConfigError, LifecycleError};
pub use lifecycle::{
    shutdown_signal, LifecycleController, LifecycleState, ShutdownHandle, ShutdownOutcome,
    ShutdownResult,
};
pub use recovery::{open_database, Recovery};
