//! Filesystem path helpers.
//!
//! - [`fs`]: path normalization (`normalize_path`, `resolve_from`, `display_relative`)

pub mod fs;

pub use fs::{display_relative, normalize_path, resolve_from};
