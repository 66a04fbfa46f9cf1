//! Routes and their metadata.
//!
//! - [`catalog`]: static routes + content manifest -> ordered, unique `Route`s
//! - [`entry`]: content manifest decoding
//! - [`meta`]: `Route` -> `PageMetadata`, description checks
//! - [`route`]: the `Route` type

pub mod catalog;
pub mod entry;
pub mod meta;
pub mod route;

pub use catalog::{Catalog, CatalogWarning, build_catalog};
pub use meta::{MetadataResolver, PageMetadata, check_descriptions};
pub use route::{Route, RouteKind};
