//! Foundation types for the Cardápio overlay catalog.
//!
//! This crate provides the product data model shared by every other catalog
//! crate: the overlay store persists it, the merge engine reconciles it, and
//! the view layer filters and sorts it.
//!
//! # Key Types
//!
//! - [`ProductId`]: Stable string identifier, unique across the merged catalog
//! - [`Product`]: A catalog entry with name, category, stock, and pricing
//! - [`Pricing`]: Flat price or price-by-size, chosen explicitly
//! - [`SizePrice`]: One labelled tier of a sized price list
//!
//! Products travel as JSON using the catalog's Portuguese field names
//! (`nome`, `categoria`, `estoque`, `preco`, `tamanhos`). Decoding coerces
//! loosely typed input instead of rejecting it; see [`product`] for the rules.

pub mod error;
pub mod identity;
pub mod product;

pub use error::TypeError;
pub use identity::ProductId;
pub use product::{Pricing, Product, SizePrice};
