use thiserror::Error;

use crate::editor::ValidationError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to load base collection: {0}")]
    Load(#[from] catalog_source::SourceError),

    #[error("store error: {0}")]
    Store(#[from] catalog_store::StoreError),

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("product not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
