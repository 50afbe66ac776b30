//! Providers of the read-only base product collection.
//!
//! The base list is the one asynchronous input of the catalog. It is fetched
//! once per view refresh through a [`BaseSource`]; any failure (unreachable,
//! non-success status, malformed body) is returned to the caller as a
//! [`SourceError`] and never replaced by an empty list.

pub mod error;
pub mod file;
pub mod http;
pub mod source;

pub use error::{SourceError, SourceResult};
pub use file::FileSource;
pub use http::HttpSource;
pub use source::{parse_base, BaseSource, StaticSource};
