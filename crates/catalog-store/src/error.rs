/// Errors from overlay store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Serialization failure while encoding a snapshot.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend is unusable (poisoned lock, failed atomic rename, ...).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A bulk import payload was rejected. The overlay is left unchanged.
    #[error("invalid import: {0}")]
    InvalidImport(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
