//! Stale page removal.
//!
//! Only `index.html` files are candidates. Everything else in the output
//! directory (bundled assets, images, side files) is left alone.

use super::write::output_path;
use crate::core::RoutePath;
use crate::debug;
use jwalk::WalkDir;
use rustc_hash::FxHashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const PAGE_FILE: &str = "index.html";

#[derive(Debug, Default)]
pub struct PruneReport {
    /// Removed page files, sorted.
    pub removed: Vec<PathBuf>,
    /// Directories left empty and removed.
    pub dirs_removed: usize,
}

/// Remove `index.html` files whose route is not in `keep`, then the
/// directories that became empty.
pub fn prune(output_dir: &Path, keep: &FxHashSet<RoutePath>) -> io::Result<PruneReport> {
    let mut report = PruneReport::default();
    if !output_dir.is_dir() {
        return Ok(report);
    }

    let stale: Vec<PathBuf> = collect_pages(output_dir)
        .into_iter()
        .filter(|(route, _)| !keep.contains(route))
        .map(|(_, file)| file)
        .collect();

    for file in stale {
        fs::remove_file(&file)?;
        debug!("prune"; "removed {}", file.display());
        report.dirs_removed += remove_empty_parents(&file, output_dir);
        report.removed.push(file);
    }

    Ok(report)
}

/// Remove the pages previously written for `routes`, then the directories
/// that became empty. Missing pages are not an error.
pub fn remove_pages<'a>(
    output_dir: &Path,
    routes: impl IntoIterator<Item = &'a RoutePath>,
) -> io::Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for route in routes {
        let file = output_path(output_dir, route);
        if !file.is_file() {
            continue;
        }
        fs::remove_file(&file)?;
        debug!("prune"; "removed {}", file.display());
        remove_empty_parents(&file, output_dir);
        removed.push(file);
    }
    Ok(removed)
}

/// Every `index.html` below `output_dir` with the route it serves, sorted by route.
///
/// Files in directories that are not valid route paths are skipped.
pub fn collect_pages(output_dir: &Path) -> Vec<(RoutePath, PathBuf)> {
    let mut pages: Vec<_> = WalkDir::new(output_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() == PAGE_FILE)
        .filter_map(|e| {
            let path = e.path();
            page_route(output_dir, &path).map(|route| (route, path))
        })
        .collect();
    pages.sort();
    pages
}

/// Route a page file was written for, if its directory is a valid route path.
fn page_route(output_dir: &Path, file: &Path) -> Option<RoutePath> {
    let dir = file.parent()?.strip_prefix(output_dir).ok()?;
    let segments: Vec<&str> = dir
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    RoutePath::parse(&format!("/{}", segments.join("/"))).ok()
}

fn remove_empty_parents(file: &Path, output_dir: &Path) -> usize {
    let mut removed = 0;
    let mut dir = file.parent();
    while let Some(current) = dir {
        if current == output_dir || !current.starts_with(output_dir) {
            break;
        }
        let empty = fs::read_dir(current)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if !empty || fs::remove_dir(current).is_err() {
            break;
        }
        removed += 1;
        dir = current.parent();
    }
    removed
}
