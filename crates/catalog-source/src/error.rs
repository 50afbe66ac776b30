use thiserror::Error;

/// Failures loading the base collection.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not be reached at all.
    #[error("base collection unreachable at {origin}: {reason}")]
    Unreachable { origin: String, reason: String },

    /// The source answered with a non-success status.
    #[error("base collection at {origin} returned status {status}")]
    Status { origin: String, status: u16 },

    /// The body is not a JSON array of products.
    #[error("malformed base collection from {origin}: {reason}")]
    Malformed { origin: String, reason: String },

    /// Local I/O failure reading the source.
    #[error("failed to read base collection {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    /// The blocking fetch task panicked or was cancelled.
    #[error("fetch task failed: {0}")]
    Task(String),
}

/// Result alias for source operations.
pub type SourceResult<T> = Result<T, SourceError>;
