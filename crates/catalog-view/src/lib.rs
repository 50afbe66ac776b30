//! Derived views over the merged catalog.
//!
//! Everything here is a pure transformation of the merge output:
//!
//! - [`filter`] keeps the products matching a [`Filter`] (category plus a
//!   case- and accent-insensitive name query)
//! - [`sort`] reorders them by a [`SortMode`]
//! - [`format_brl`] renders an amount the way the catalog displays prices

pub mod error;
pub mod filter;
pub mod format;
pub mod sort;
pub mod text;

pub use error::ViewError;
pub use filter::{categories, filter, CategoryFilter, Filter};
pub use format::format_brl;
pub use sort::{sort, SortMode};
pub use text::{compare_names, fold};

use catalog_types::Product;

/// Filter, then sort.
pub fn apply(items: &[Product], filter_by: &Filter, mode: SortMode) -> Vec<Product> {
    sort(filter::filter(items, filter_by), mode)
}
