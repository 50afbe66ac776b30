use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::{KvBackend, KvOp};

/// In-memory, HashMap-based key-value backend.
///
/// Intended for tests and embedding. Entries live behind a `RwLock`; a batch
/// is applied under a single write lock, so readers see all of it or none.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of stored keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl KvBackend for InMemoryBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let map = self
            .entries
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(map.get(key).cloned())
    }

    fn apply(&self, batch: &[KvOp]) -> StoreResult<()> {
        let mut map = self
            .entries
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        for op in batch {
            match op {
                KvOp::Put { key, value } => {
                    map.insert(key.clone(), value.clone());
                }
                KvOp::Remove { key } => {
                    map.remove(key);
                }
            }
        }
        Ok(())
    }
}
