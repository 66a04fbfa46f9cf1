//! Command-line interface module.

mod args;
pub mod build;
pub mod routes;
pub mod sitemap;
pub mod verify;

pub use args::{Cli, Commands};
