//! Filesystem side of a build.
//!
//! - `write`: directory-style page paths (`/a/b` -> `a/b/index.html`)
//! - `prune`: remove pages whose route disappeared

mod prune;
mod write;

pub use prune::{collect_pages, prune, remove_pages};
pub use write::{WriteError, clean_output, output_path, write_file, write_page};
