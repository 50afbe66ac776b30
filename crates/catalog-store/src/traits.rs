use crate::error::StoreResult;

/// A single write in a [`KvBackend::apply`] batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KvOp {
    Put { key: String, value: String },
    Remove { key: String },
}

impl KvOp {
    pub fn put(key: impl Into<String>, value: impl Into<String>) -> Self {
        KvOp::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        KvOp::Remove { key: key.into() }
    }

    pub fn key(&self) -> &str {
        match self {
            KvOp::Put { key, .. } | KvOp::Remove { key } => key,
        }
    }
}

/// String key-value storage the overlay persists into.
///
/// All implementations must satisfy these invariants:
/// - `apply` is atomic: after it returns, either every op in the batch is
///   visible or none is. A reader never observes half a batch.
/// - Ops in a batch are applied in order; a later op on the same key wins.
/// - The backend never interprets values.
pub trait KvBackend: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Apply a batch of writes atomically.
    fn apply(&self, batch: &[KvOp]) -> StoreResult<()>;

    /// Store a single value.
    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.apply(&[KvOp::put(key, value)])
    }

    /// Remove a single key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()> {
        self.apply(&[KvOp::remove(key)])
    }
}

impl<T: KvBackend + ?Sized> KvBackend for std::sync::Arc<T> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn apply(&self, batch: &[KvOp]) -> StoreResult<()> {
        (**self).apply(batch)
    }
}
