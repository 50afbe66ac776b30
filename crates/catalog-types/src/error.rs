use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid product id: {0:?}")]
    InvalidId(String),

    #[error("malformed product: {0}")]
    MalformedProduct(String),
}
