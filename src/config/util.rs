//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/site/content/posts/  ← cwd
/// /home/user/site/prerender.toml  ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_from(&cwd, config_name)
}

/// Upward search starting at `start`.
pub fn find_config_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================
