//! Pagination over insertion order.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// An offset/limit window over a table's rows, oldest first.
///
/// Offsets and limits are unsigned, so the negative values a request layer
/// might produce must be rejected (or clamped) before a `Page` is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Number of surviving rows to skip
    pub offset: usize,
    /// Maximum number of rows to return
    pub limit: usize,
}

impl Page {
    /// Create a page window.
    pub fn new(offset: usize, limit: usize) -> Self {
        Page { offset, limit }
    }

    /// Every row, from the oldest.
    pub fn all() -> Self {
        Page {
            offset: 0,
            limit: usize::MAX,
        }
    }

    /// Resolve the window against a collection of `len` rows.
    ///
    /// The result always lies within `0..len` and holds
    /// `max(0, min(limit, len - offset))` positions.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        let end = start.saturating_add(self.limit).min(len);
        start..end
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::all()
    }
}
