use thiserror::Error;

/// Errors produced while parsing view options.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("unknown sort mode: {0}")]
    UnknownSortMode(String),
}
