//! Persisted overlay store for the Cardápio catalog.
//!
//! The overlay is the set of local changes layered on top of the read-only
//! base product list. It is made of two collections:
//!
//! - **edits** -- products created or updated locally, keyed by id
//! - **tombstones** -- ids of products deleted from the effective view
//!
//! Both are kept as JSON under two fixed keys of a [`KvBackend`].
//!
//! # Storage Backends
//!
//! All backends implement the [`KvBackend`] trait:
//!
//! - [`InMemoryBackend`] -- `HashMap`-based backend for tests and embedding
//! - [`FileBackend`] -- single JSON document on disk, replaced atomically
//!
//! # Design Rules
//!
//! 1. An id is never in both collections after `upsert` or `delete`.
//! 2. Every mutation writes both collections in one atomic batch.
//! 3. Reading never fails: missing or corrupt entries load as empty.
//! 4. Every mutation re-reads persisted state first; nothing is cached.

pub mod error;
pub mod file;
pub mod memory;
pub mod overlay;
pub mod store;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
pub use overlay::{EditSet, Overlay, OverlayStatus, TombstoneSet};
pub use store::{OverlayStore, StoreKeys, DEFAULT_EDITS_KEY, DEFAULT_TOMBSTONES_KEY};
pub use traits::{KvBackend, KvOp};
