//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `resolve_from` - resolve config-relative paths against the project root
//! - `display_relative` - short paths for log lines

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a path from the config file against the project root.
///
/// Absolute paths are kept; relative ones are joined onto `root`.
/// The target does not need to exist (output directories usually don't yet).
#[inline]
pub fn resolve_from(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Path relative to `root` for display, or the path itself when outside it.
pub fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_from() {
        let root = Path::new("/site");
        assert_eq!(resolve_from(root, Path::new("dist")), Path::new("/site/dist"));
        assert_eq!(resolve_from(root, Path::new("/abs/out")), Path::new("/abs/out"));
    }

    #[test]
    fn test_display_relative() {
        let root = Path::new("/site");
        assert_eq!(
            display_relative(Path::new("/site/dist/about/index.html"), root),
            "dist/about/index.html"
        );
        assert_eq!(display_relative(Path::new("/other/x"), root), "/other/x");
    }

    #[test]
    fn test_normalize_path_absolute_fallback() {
        let missing = Path::new("/definitely/not/here/prerender");
        assert_eq!(normalize_path(missing), missing);
    }
}
