use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use catalog_store::{EditSet, Overlay, TombstoneSet};
use catalog_types::{Product, ProductId};

/// What a merge did, for logging and status lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Distinct ids in the base collection.
    pub base: usize,
    /// Base records hidden by a tombstone.
    pub removed: usize,
    /// Visible records replaced by an edit.
    pub replaced: usize,
    /// Edits for ids not visible after tombstones (pure additions).
    pub added: usize,
    /// Size of the merged collection.
    pub total: usize,
}

/// Insertion-ordered working map. Removed slots are left empty so that a
/// re-inserted id goes to the end, like a fresh insertion.
#[derive(Default)]
struct Working {
    slots: Vec<Option<Product>>,
    index: HashMap<ProductId, usize>,
}

impl Working {
    /// Returns `true` if an existing entry was replaced.
    fn set(&mut self, product: Product) -> bool {
        match self.index.get(&product.id) {
            Some(&slot) => {
                self.slots[slot] = Some(product);
                true
            }
            None => {
                self.index.insert(product.id.clone(), self.slots.len());
                self.slots.push(Some(product));
                false
            }
        }
    }

    /// Returns `true` if the id was present.
    fn remove(&mut self, id: &str) -> bool {
        match self.index.remove(id) {
            Some(slot) => {
                self.slots[slot] = None;
                true
            }
            None => false,
        }
    }

    fn into_values(self) -> Vec<Product> {
        self.slots.into_iter().flatten().collect()
    }
}

/// Compute the effective collection from base, edits, and tombstones.
pub fn merge(base: &[Product], edits: &EditSet, tombstones: &TombstoneSet) -> Vec<Product> {
    merge_with_stats(base, edits, tombstones).0
}

/// [`merge`] over a loaded [`Overlay`].
pub fn merge_overlay(base: &[Product], overlay: &Overlay) -> Vec<Product> {
    merge(base, &overlay.edits, &overlay.tombstones)
}

/// [`merge`], also reporting what changed relative to the base.
pub fn merge_with_stats(
    base: &[Product],
    edits: &EditSet,
    tombstones: &TombstoneSet,
) -> (Vec<Product>, MergeStats) {
    let mut working = Working::default();
    for product in base {
        working.set(product.clone());
    }

    let mut stats = MergeStats {
        base: working.index.len(),
        ..MergeStats::default()
    };

    for id in tombstones {
        if working.remove(id.as_str()) {
            stats.removed += 1;
        }
    }

    for product in edits {
        if working.set(product.clone()) {
            stats.replaced += 1;
        } else {
            stats.added += 1;
        }
    }

    let merged = working.into_values();
    stats.total = merged.len();
    debug!(
        base = stats.base,
        removed = stats.removed,
        replaced = stats.replaced,
        added = stats.added,
        total = stats.total,
        "catalog merged"
    );
    (merged, stats)
}
