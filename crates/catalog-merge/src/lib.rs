//! Merge engine for the Cardápio catalog.
//!
//! Computes the effective product list from the read-only base collection
//! and the local overlay. The computation is a pure function of its three
//! inputs:
//!
//! 1. index the base by id (a repeated base id keeps its first position and
//!    its last value)
//! 2. drop every tombstoned id
//! 3. insert or replace every edit; ids unknown to the base are additions
//!
//! Output order is base order, with edited base records keeping their slot
//! and new records appended in edit order. Callers that want a display
//! order sort the result themselves.

pub mod engine;

pub use engine::{merge, merge_overlay, merge_with_stats, MergeStats};
