//! Core types for rowstore
//!
//! This crate defines the vocabulary shared by every layer:
//! - `Row`: the capability a value needs to be stored in a table
//! - `StoreError`: the not-found conditions callers translate into domain errors
//! - `Page`: offset/limit pagination over insertion order

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod row;
pub mod types;

pub use error::{Result, StoreError};
pub use row::{JsonRow, Row};
pub use types::Page;
