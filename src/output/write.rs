//! Page and side-file writing.

use crate::core::RoutePath;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("cannot write {}: {source}", .path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl WriteError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// `/` -> `{output_dir}/index.html`, `/a/b` -> `{output_dir}/a/b/index.html`
pub fn output_path(output_dir: &Path, route: &RoutePath) -> PathBuf {
    output_dir.join(route.relative_output())
}

/// Write a rendered page to its directory-style location.
pub fn write_page(output_dir: &Path, route: &RoutePath, html: &str) -> Result<PathBuf, WriteError> {
    let path = output_path(output_dir, route);
    write_file(&path, html)?;
    Ok(path)
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| WriteError::new(parent, e))?;
    }
    fs::write(path, content).map_err(|e| WriteError::new(path, e))
}

/// Remove the whole output directory (`--clean`). Missing is fine.
pub fn clean_output(output_dir: &Path) -> Result<(), WriteError> {
    match fs::remove_dir_all(output_dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(WriteError::new(output_dir, e)),
    }
}
