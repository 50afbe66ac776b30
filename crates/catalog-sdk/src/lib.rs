//! High-level SDK for the Cardápio overlay catalog.
//!
//! Ties the crates together the way a front end uses them: fetch the base
//! collection, load the overlay, merge, then filter and sort for display.
//! Edits go through [`ProductDraft`] validation before reaching the store.
//! This is the main entry point for applications embedding the catalog.

pub mod catalog;
pub mod config;
pub mod editor;
pub mod error;
pub mod stock;

pub use catalog::Catalog;
pub use config::{BaseLocation, CatalogConfig, ConfiguredSource, EditorDefaults};
pub use editor::{PricingDraft, ProductDraft, TierDraft, ValidationError};
pub use error::{CatalogError, CatalogResult};
pub use stock::StockAdjustment;

// Re-export key types
pub use catalog_merge::MergeStats;
pub use catalog_source::{BaseSource, FileSource, HttpSource, SourceError, StaticSource};
pub use catalog_store::{FileBackend, InMemoryBackend, KvBackend, OverlayStatus, OverlayStore};
pub use catalog_types::{Pricing, Product, ProductId, SizePrice};
pub use catalog_view::{format_brl, CategoryFilter, Filter, SortMode};
