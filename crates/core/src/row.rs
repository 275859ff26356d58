//! The row capability.
//!
//! The store never looks inside a row. It only needs to clone rows out from
//! under the lock, move them across threads, and hand them to the snapshot
//! codec. Any type meeting those bounds is a row.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Capability required of values stored in a table.
///
/// Blanket-implemented for every type with the right bounds. A database is
/// generic over one row type, so storing a mismatched entity is a compile
/// error rather than a runtime cast. Applications with several entity kinds
/// store an enum; fully schemaless callers use [`JsonRow`].
pub trait Row: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Row for T where T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Opaque row representation.
pub type JsonRow = serde_json::Value;
