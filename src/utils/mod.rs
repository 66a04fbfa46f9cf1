//! Shared helpers with no domain knowledge.

pub mod date;
pub mod html;
pub mod path;
pub mod plural;

pub use plural::{plural_count, plural_s};
