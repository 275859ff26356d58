//! Storage layer for rowstore
//!
//! This crate implements the in-memory table store:
//! - Table: insertion-ordered arena with an id index
//! - Database: table directory behind a single RwLock
//! - Images: owned copies of the directory used for snapshots and restore

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod image;
pub mod table;

pub use database::{Database, JsonDatabase, TableRef, TableStats};
pub use image::{DatabaseImage, ImageError, RowImage, TableImage};
pub use table::Table;
