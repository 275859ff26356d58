//! Insertion-ordered row collection
//!
//! A `Table` keeps rows in the order their ids were first inserted while
//! still answering lookups by id in O(1).
//!
//! # Design
//!
//! - Arena: `Vec<Option<Slot>>`, one slot per inserted id, in insertion order
//! - Index: FxHashMap from id to arena position
//! - Deletes leave a tombstone (`None`); the arena is compacted once
//!   tombstones outnumber live rows
//! - Replacing a row writes into its existing slot, so it keeps its position
//!
//! The table has no locking of its own. The owning `Database` guards every
//! table with one shared RwLock.

use crate::image::{ImageError, RowImage, TableImage};
use rowstore_core::Page;
use rustc_hash::FxHashMap;

/// Tombstones tolerated before compaction is considered at all.
const COMPACT_FLOOR: usize = 32;

#[derive(Debug, Clone)]
struct Slot<R> {
    id: String,
    seq: u64,
    row: R,
}

/// An insertion-ordered mapping from string id to row.
#[derive(Debug, Clone)]
pub struct Table<R> {
    slots: Vec<Option<Slot<R>>>,
    index: FxHashMap<String, usize>,
    /// Distinct ids ever inserted; never decreases
    inserted: u64,
}

impl<R> Table<R> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: FxHashMap::default(),
            inserted: 0,
        }
    }

    /// Create an empty table with room for `capacity` rows
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            inserted: 0,
        }
    }

    /// Insert a row, or replace the row already stored under `id`.
    ///
    /// A replaced row keeps its original position. Returns `true` when `id`
    /// was new to the table.
    pub fn set(&mut self, id: &str, row: R) -> bool {
        if let Some(slot) = self.slot_mut(id) {
            slot.row = row;
            return false;
        }

        let seq = self.inserted;
        self.inserted += 1;
        self.index.insert(id.to_string(), self.slots.len());
        self.slots.push(Some(Slot {
            id: id.to_string(),
            seq,
            row,
        }));
        true
    }

    /// Get the row stored under `id`
    pub fn get(&self, id: &str) -> Option<&R> {
        let pos = *self.index.get(id)?;
        self.slots[pos].as_ref().map(|slot| &slot.row)
    }

    /// Get a mutable reference to the row stored under `id`
    pub fn get_mut(&mut self, id: &str) -> Option<&mut R> {
        self.slot_mut(id).map(|slot| &mut slot.row)
    }

    /// Remove the row stored under `id`.
    ///
    /// Removing a missing id is a no-op and returns `None`.
    pub fn delete(&mut self, id: &str) -> Option<R> {
        let pos = self.index.remove(id)?;
        let removed = self.slots[pos].take().map(|slot| slot.row);
        self.maybe_compact();
        removed
    }

    /// Check if a row exists under `id`
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of rows currently present
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of distinct ids ever inserted, including deleted ones.
    ///
    /// Repositories use this to allocate the next numeric id.
    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    /// Insertion sequence stamp of the row under `id`
    pub fn seq_of(&self, id: &str) -> Option<u64> {
        let pos = *self.index.get(id)?;
        self.slots[pos].as_ref().map(|slot| slot.seq)
    }

    /// Iterate surviving `(id, row)` pairs, oldest first
    pub fn iter(&self) -> impl Iterator<Item = (&str, &R)> + '_ {
        self.slots
            .iter()
            .flatten()
            .map(|slot| (slot.id.as_str(), &slot.row))
    }

    /// Iterate surviving ids, oldest first
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(id, _)| id)
    }

    /// Iterate the rows inside `page`, oldest first.
    ///
    /// An offset past the end yields nothing; a window running past the end
    /// is truncated.
    pub fn page(&self, page: Page) -> impl Iterator<Item = &R> + '_ {
        let range = page.range(self.len());
        self.iter()
            .skip(range.start)
            .take(range.len())
            .map(|(_, row)| row)
    }

    fn slot_mut(&mut self, id: &str) -> Option<&mut Slot<R>> {
        let pos = *self.index.get(id)?;
        self.slots[pos].as_mut()
    }

    fn tombstones(&self) -> usize {
        self.slots.len() - self.index.len()
    }

    fn maybe_compact(&mut self) {
        let dead = self.tombstones();
        if dead > COMPACT_FLOOR && dead > self.index.len() {
            self.compact();
        }
    }

    /// Drop tombstones and re-point the index at the new positions
    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        for (pos, slot) in self.slots.iter().flatten().enumerate() {
            if let Some(entry) = self.index.get_mut(&slot.id) {
                *entry = pos;
            }
        }
    }
}

impl<R: Clone> Table<R> {
    /// Clone the rows inside `page` into an owned, ordered sequence.
    ///
    /// The result does not observe later mutations.
    pub fn rows(&self, page: Page) -> Vec<R> {
        self.page(page).cloned().collect()
    }

    /// Owned copy of the table suitable for serialization
    pub fn to_image(&self) -> TableImage<R> {
        TableImage {
            inserted: self.inserted,
            rows: self
                .slots
                .iter()
                .flatten()
                .map(|slot| RowImage {
                    id: slot.id.clone(),
                    seq: slot.seq,
                    row: slot.row.clone(),
                })
                .collect(),
        }
    }
}

impl<R> Table<R> {
    /// Rebuild a table from an image.
    ///
    /// Rows must have unique ids and strictly increasing sequence stamps, all
    /// below the image's insertion counter. `name` is only used in errors.
    pub fn from_image(name: &str, image: TableImage<R>) -> Result<Self, ImageError> {
        let mut table = Table::with_capacity(image.rows.len());
        let mut last_seq: Option<u64> = None;

        for row in image.rows {
            if table.index.contains_key(&row.id) {
                return Err(ImageError::DuplicateRow {
                    table: name.to_string(),
                    id: row.id,
                });
            }
            if last_seq.is_some_and(|last| row.seq <= last) {
                return Err(ImageError::SequenceOrder {
                    table: name.to_string(),
                    id: row.id,
                });
            }
            if row.seq >= image.inserted {
                return Err(ImageError::CounterBehind {
                    table: name.to_string(),
                    inserted: image.inserted,
                    seq: row.seq,
                });
            }

            last_seq = Some(row.seq);
            table.index.insert(row.id.clone(), table.slots.len());
            table.slots.push(Some(Slot {
                id: row.id,
                seq: row.seq,
                row: row.row,
            }));
        }

        table.inserted = image.inserted;
        Ok(table)
    }
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}
