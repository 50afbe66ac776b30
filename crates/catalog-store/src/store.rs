use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use catalog_types::{Product, ProductId};

use crate::error::{StoreError, StoreResult};
use crate::overlay::{EditSet, Overlay, OverlayStatus, TombstoneSet};
use crate::traits::{KvBackend, KvOp};

/// Storage key of the edits collection.
pub const DEFAULT_EDITS_KEY: &str = "cardapio-overlay-v1";
/// Storage key of the tombstone collection.
pub const DEFAULT_TOMBSTONES_KEY: &str = "cardapio-deleted-v1";

/// The two backend keys an [`OverlayStore`] owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreKeys {
    pub edits: String,
    pub tombstones: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            edits: DEFAULT_EDITS_KEY.into(),
            tombstones: DEFAULT_TOMBSTONES_KEY.into(),
        }
    }
}

/// Durable overlay of local product edits and deletions.
///
/// Every mutation reads the persisted state, applies the change, and writes
/// both collections back in a single [`KvBackend::apply`] batch. Mutations
/// are serialized by an internal lock so two read-modify-write cycles never
/// interleave.
pub struct OverlayStore<B> {
    backend: B,
    keys: StoreKeys,
    write_lock: Mutex<()>,
}

impl<B: KvBackend> OverlayStore<B> {
    /// Create a store over `backend` using the default keys.
    pub fn new(backend: B) -> Self {
        Self::with_keys(backend, StoreKeys::default())
    }

    pub fn with_keys(backend: B, keys: StoreKeys) -> Self {
        Self {
            backend,
            keys,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    /// Read both collections.
    ///
    /// Never fails: a missing entry is empty, and an unreadable or corrupt
    /// entry is logged and treated as empty.
    pub fn load(&self) -> Overlay {
        Overlay {
            edits: self.read_entry::<EditSet>(&self.keys.edits),
            tombstones: self.read_entry::<TombstoneSet>(&self.keys.tombstones),
        }
    }

    /// Counts of edits and tombstones currently persisted.
    pub fn status(&self) -> OverlayStatus {
        self.load().status()
    }

    /// Insert or replace the edit for `product.id` and clear its tombstone.
    pub fn upsert(&self, product: Product) -> StoreResult<()> {
        let _guard = self.lock()?;
        let mut overlay = self.load_for_update()?;
        let id = product.id.clone();
        let replaced = overlay.edits.upsert(product).is_some();
        let resurrected = overlay.tombstones.remove(id.as_str());
        self.persist(&overlay)?;
        debug!(%id, replaced, resurrected, "overlay upsert");
        Ok(())
    }

    /// Drop any edit for `id` and record a tombstone for it.
    pub fn delete(&self, id: &ProductId) -> StoreResult<()> {
        let _guard = self.lock()?;
        let mut overlay = self.load_for_update()?;
        let had_edit = overlay.edits.remove(id.as_str()).is_some();
        let newly_deleted = overlay.tombstones.insert(id.clone());
        self.persist(&overlay)?;
        debug!(%id, had_edit, newly_deleted, "overlay delete");
        Ok(())
    }

    /// Remove both collections from the backend in one batch.
    pub fn reset(&self) -> StoreResult<()> {
        let _guard = self.lock()?;
        self.backend.apply(&[
            KvOp::remove(self.keys.edits.as_str()),
            KvOp::remove(self.keys.tombstones.as_str()),
        ])?;
        info!("overlay reset");
        Ok(())
    }

    /// Replace the whole edits collection. Tombstones are not touched.
    ///
    /// Returns the number of distinct edits stored.
    pub fn replace_edits(&self, products: Vec<Product>) -> StoreResult<usize> {
        let _guard = self.lock()?;
        let edits = EditSet::from_products(products);
        let value = encode(&edits)?;
        self.backend
            .apply(&[KvOp::put(self.keys.edits.as_str(), value)])?;
        debug!(edits = edits.len(), "overlay edits replaced");
        Ok(edits.len())
    }

    /// Bulk import: parse `text` as a JSON array of products and replace the
    /// edits collection with it.
    ///
    /// Anything other than an array of product-shaped objects is rejected
    /// with [`StoreError::InvalidImport`] and the overlay is left unchanged.
    pub fn import_json(&self, text: &str) -> StoreResult<usize> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| StoreError::InvalidImport(format!("not valid JSON: {e}")))?;
        let serde_json::Value::Array(items) = value else {
            return Err(StoreError::InvalidImport(
                "expected a JSON array of products".into(),
            ));
        };
        let products = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                Product::from_value(item)
                    .map_err(|e| StoreError::InvalidImport(format!("item {i}: {e}")))
            })
            .collect::<StoreResult<Vec<_>>>()?;
        let stored = self.replace_edits(products)?;
        info!(stored, "overlay imported");
        Ok(stored)
    }

    fn persist(&self, overlay: &Overlay) -> StoreResult<()> {
        let edits = encode(&overlay.edits)?;
        let tombstones = encode(&overlay.tombstones)?;
        self.backend.apply(&[
            KvOp::put(self.keys.edits.as_str(), edits),
            KvOp::put(self.keys.tombstones.as_str(), tombstones),
        ])
    }

    /// Like [`load`](Self::load), but a backend read failure is returned
    /// instead of being read as empty. Only undecodable entries fall back
    /// to empty, so a mutation never overwrites state it could not read.
    fn load_for_update(&self) -> StoreResult<Overlay> {
        Ok(Overlay {
            edits: self.read_for_update::<EditSet>(&self.keys.edits)?,
            tombstones: self.read_for_update::<TombstoneSet>(&self.keys.tombstones)?,
        })
    }

    fn read_entry<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.backend.get(key) {
            Ok(None) => T::default(),
            Ok(Some(text)) => decode_or_default(key, &text),
            Err(e) => {
                warn!(key, error = %e, "overlay entry unreadable, treating as empty");
                T::default()
            }
        }
    }

    fn read_for_update<T: DeserializeOwned + Default>(&self, key: &str) -> StoreResult<T> {
        Ok(self
            .backend
            .get(key)?
            .map(|text| decode_or_default(key, &text))
            .unwrap_or_default())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
    }
}

fn decode_or_default<T: DeserializeOwned + Default>(key: &str, text: &str) -> T {
    serde_json::from_str(text).unwrap_or_else(|e| {
        warn!(key, error = %e, "corrupt overlay entry, treating as empty");
        T::default()
    })
}

fn encode<T: Serialize>(value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

impl<B> std::fmt::Debug for OverlayStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayStore")
            .field("keys", &self.keys)
            .finish()
    }
}
