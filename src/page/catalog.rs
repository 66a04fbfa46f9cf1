//! Route catalog: static routes plus posts from the content manifest.
//!
//! Static routes come first in declared order, then posts in manifest order.
//! A path declared twice keeps the slot of its first occurrence and the data
//! of its last one.

use super::entry::{ContentEntry, RecordIssue, SourceError, load_manifest};
use super::route::{Route, RouteKind};
use crate::config::{ContentSectionConfig, RouteConfig};
use crate::core::{Priority, RoutePath, RoutePathError};
use crate::debug;
use crate::utils::date::DateTimeUtc;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::PathBuf;
use thiserror::Error;

/// Non-fatal problem found while building the catalog.
#[derive(Debug, Error)]
pub enum CatalogWarning {
    #[error("content source `{}` unavailable, using static routes only: {source}", .path.display())]
    SourceUnavailable { path: PathBuf, source: SourceError },

    #[error("malformed record #{index}{}: {reason}", .id.as_deref().map(|id| format!(" (`{id}`)")).unwrap_or_default())]
    MalformedRecord {
        index: usize,
        id: Option<String>,
        reason: String,
    },

    #[error("`{subject}`: unparseable date `{value}` ignored")]
    InvalidDate { subject: String, value: String },

    #[error("route `{raw}` ignored: {source}")]
    InvalidPath { raw: String, source: RoutePathError },

    #[error("duplicate route `{path}`: {} entry replaces the earlier {} entry", .by.as_str(), .replaced.as_str())]
    DuplicatePath {
        path: RoutePath,
        replaced: RouteKind,
        by: RouteKind,
    },

    #[error("priority {value} of `{path}` clamped to {clamped}")]
    PriorityClamped {
        path: RoutePath,
        value: f32,
        clamped: Priority,
    },
}

impl From<RecordIssue> for CatalogWarning {
    fn from(issue: RecordIssue) -> Self {
        match issue {
            RecordIssue::Malformed { index, id, reason } => Self::MalformedRecord { index, id, reason },
            RecordIssue::InvalidDate { id, value } => Self::InvalidDate { subject: id, value },
        }
    }
}

/// Unified, de-duplicated route list.
#[derive(Debug, Default)]
pub struct Catalog {
    pub routes: Vec<Route>,
    pub warnings: Vec<CatalogWarning>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn paths(&self) -> FxHashSet<RoutePath> {
        self.routes.iter().map(|r| r.path.clone()).collect()
    }

    pub fn get(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.path.as_str() == path)
    }

    /// Append a route, replacing an existing one with the same path in place.
    fn push(&mut self, route: Route, slots: &mut FxHashMap<RoutePath, usize>) {
        match slots.get(&route.path) {
            Some(&slot) => {
                self.warnings.push(CatalogWarning::DuplicatePath {
                    path: route.path.clone(),
                    replaced: self.routes[slot].kind,
                    by: route.kind,
                });
                self.routes[slot] = route;
            }
            None => {
                slots.insert(route.path.clone(), self.routes.len());
                self.routes.push(route);
            }
        }
    }
}

/// Build the catalog from `[[routes]]` and the `[content]` manifest.
///
/// Never fails: an unusable manifest degrades to static routes with a
/// `SourceUnavailable` warning.
pub fn build_catalog(static_routes: &[RouteConfig], content: &ContentSectionConfig) -> Catalog {
    let mut catalog = Catalog::default();
    let mut slots = FxHashMap::default();

    for declared in static_routes {
        if let Some(route) = static_route(declared, &mut catalog.warnings) {
            catalog.push(route, &mut slots);
        }
    }

    let Some(source) = &content.source else {
        return catalog;
    };

    let manifest = match load_manifest(source) {
        Ok(manifest) => manifest,
        Err(err) => {
            catalog.warnings.push(CatalogWarning::SourceUnavailable {
                path: source.clone(),
                source: err,
            });
            return catalog;
        }
    };
    debug!("catalog"; "{} posts in {}", manifest.entries.len(), source.display());

    catalog
        .warnings
        .extend(manifest.issues.into_iter().map(CatalogWarning::from));

    let prefix = content.prefix_path();
    for (index, entry) in manifest.entries.into_iter().enumerate() {
        match content_route(entry, &prefix, content, &mut catalog.warnings) {
            Ok(route) => catalog.push(route, &mut slots),
            Err((id, err)) => catalog.warnings.push(CatalogWarning::MalformedRecord {
                index,
                id: Some(id),
                reason: err.to_string(),
            }),
        }
    }

    catalog
}

fn static_route(declared: &RouteConfig, warnings: &mut Vec<CatalogWarning>) -> Option<Route> {
    let path = match RoutePath::parse(&declared.path) {
        Ok(path) => path,
        Err(source) => {
            warnings.push(CatalogWarning::InvalidPath {
                raw: declared.path.clone(),
                source,
            });
            return None;
        }
    };

    let priority = clamp_priority(&path, declared.priority, Priority::DEFAULT, warnings);
    let last_modified = declared.last_modified.as_deref().and_then(|value| {
        let parsed = DateTimeUtc::parse(value);
        if parsed.is_none() {
            warnings.push(CatalogWarning::InvalidDate {
                subject: path.to_string(),
                value: value.to_string(),
            });
        }
        parsed
    });

    Some(Route {
        priority,
        changefreq: declared.changefreq,
        last_modified,
        title: declared.title.clone(),
        summary: declared.summary.clone(),
        noindex: declared.noindex,
        ..Route::new(path, RouteKind::Static)
    })
}

fn content_route(
    entry: ContentEntry,
    prefix: &RoutePath,
    content: &ContentSectionConfig,
    warnings: &mut Vec<CatalogWarning>,
) -> Result<Route, (String, RoutePathError)> {
    let path = prefix.join(&entry.id).map_err(|e| (entry.id.clone(), e))?;

    // Out-of-range defaults were already reported by config validation
    let default_priority = Priority::clamped(content.priority).0;
    let priority = clamp_priority(&path, entry.priority, default_priority, warnings);

    Ok(Route {
        priority,
        changefreq: entry.changefreq.unwrap_or(content.changefreq),
        last_modified: entry.last_modified,
        title: Some(entry.title),
        summary: entry.summary,
        ..Route::new(path, RouteKind::Content)
    })
}

fn clamp_priority(
    path: &RoutePath,
    value: Option<f32>,
    default: Priority,
    warnings: &mut Vec<CatalogWarning>,
) -> Priority {
    let Some(value) = value else {
        return default;
    };
    let (priority, clamped) = Priority::clamped(value);
    if clamped {
        warnings.push(CatalogWarning::PriorityClamped {
            path: path.clone(),
            value,
            clamped: priority,
        });
    }
    priority
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChangeFrequency;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn route(path: &str) -> RouteConfig {
        RouteConfig {
            path: path.into(),
            ..Default::default()
        }
    }

    fn content_at(path: &Path) -> ContentSectionConfig {
        ContentSectionConfig {
            source: Some(path.to_path_buf()),
            ..Default::default()
        }
    }

    fn paths(catalog: &Catalog) -> Vec<&str> {
        catalog.routes.iter().map(|r| r.path.as_str()).collect()
    }

    #[test]
    fn test_static_only_without_source() {
        let catalog = build_catalog(
            &[route("/"), route("/about"), route("services/")],
            &ContentSectionConfig::default(),
        );
        assert_eq!(paths(&catalog), ["/", "/about", "/services"]);
        assert!(catalog.warnings.is_empty());
    }

    #[test]
    fn test_good_and_missing_title_record() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("posts.json");
        fs::write(&manifest, r#"[{"id":"a","title":"Post A"},{"id":"b"}]"#).unwrap();

        let catalog = build_catalog(&[route("/"), route("/about")], &content_at(&manifest));
        assert_eq!(paths(&catalog), ["/", "/about", "/blog/a"]);
        assert_eq!(catalog.warnings.len(), 1);
        assert!(matches!(
            &catalog.warnings[0],
            CatalogWarning::MalformedRecord { index: 1, id: Some(id), .. } if id == "b"
        ));

        let post = catalog.get("/blog/a").unwrap();
        assert_eq!(post.kind, RouteKind::Content);
        assert_eq!(post.priority, Priority::clamped(0.7).0);
        assert_eq!(post.changefreq, ChangeFrequency::Weekly);
        assert_eq!(post.title.as_deref(), Some("Post A"));
    }

    #[test]
    fn test_unreadable_source_falls_back_to_static() {
        let dir = TempDir::new().unwrap();
        let catalog = build_catalog(&[route("/")], &content_at(&dir.path().join("missing.json")));
        assert_eq!(paths(&catalog), ["/"]);
        assert!(matches!(
            &catalog.warnings[..],
            [CatalogWarning::SourceUnavailable { .. }]
        ));

        let corrupt = dir.path().join("posts.json");
        fs::write(&corrupt, "{ not json").unwrap();
        let catalog = build_catalog(&[route("/")], &content_at(&corrupt));
        assert_eq!(paths(&catalog), ["/"]);
        assert_eq!(catalog.warnings.len(), 1);
    }

    #[test]
    fn test_duplicates_last_write_wins_first_slot() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("posts.toml");
        fs::write(
            &manifest,
            "[[posts]]\nid = \"x\"\ntitle = \"First X\"\n[[posts]]\nid = \"y\"\ntitle = \"Y\"\n[[posts]]\nid = \"x\"\ntitle = \"Second X\"\n",
        )
        .unwrap();

        let static_routes = [
            route("/"),
            RouteConfig {
                path: "/blog/y".into(),
                title: Some("Static Y".into()),
                ..Default::default()
            },
            route("/about/"),
            route("/about"),
        ];
        let catalog = build_catalog(&static_routes, &content_at(&manifest));

        assert_eq!(paths(&catalog), ["/", "/blog/y", "/about", "/blog/x"]);
        assert_eq!(catalog.get("/blog/x").unwrap().title.as_deref(), Some("Second X"));
        let y = catalog.get("/blog/y").unwrap();
        assert_eq!(y.kind, RouteKind::Content);
        assert_eq!(y.title.as_deref(), Some("Y"));

        let duplicates = catalog
            .warnings
            .iter()
            .filter(|w| matches!(w, CatalogWarning::DuplicatePath { .. }))
            .count();
        assert_eq!(duplicates, 3);
    }

    #[test]
    fn test_priority_clamped_with_warning() {
        let declared = RouteConfig {
            path: "/".into(),
            priority: Some(1.4),
            ..Default::default()
        };
        let catalog = build_catalog(&[declared], &ContentSectionConfig::default());
        assert_eq!(catalog.routes[0].priority.value(), 1.0);
        assert!(matches!(
            &catalog.warnings[..],
            [CatalogWarning::PriorityClamped { .. }]
        ));
    }

    #[test]
    fn test_invalid_static_path_and_date() {
        let catalog = build_catalog(
            &[
                route("/a/../b"),
                RouteConfig {
                    path: "/about".into(),
                    last_modified: Some("someday".into()),
                    ..Default::default()
                },
            ],
            &ContentSectionConfig::default(),
        );
        assert_eq!(paths(&catalog), ["/about"]);
        assert_eq!(catalog.routes[0].last_modified, None);
        assert_eq!(catalog.warnings.len(), 2);
    }

    #[test]
    fn test_custom_prefix_and_defaults() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("posts.json");
        fs::write(
            &manifest,
            r#"{"posts":[{"id":"a","title":"A"},{"id":"b","title":"B","priority":0.9}]}"#,
        )
        .unwrap();
        let content = ContentSectionConfig {
            source: Some(manifest),
            prefix: "/insights".into(),
            priority: 0.6,
            changefreq: ChangeFrequency::Monthly,
        };
        let catalog = build_catalog(&[], &content);
        assert_eq!(paths(&catalog), ["/insights/a", "/insights/b"]);
        assert_eq!(catalog.routes[0].priority.to_string(), "0.6");
        assert_eq!(catalog.routes[0].changefreq, ChangeFrequency::Monthly);
        assert_eq!(catalog.routes[1].priority.to_string(), "0.9");
    }

    #[test]
    fn test_warning_messages() {
        let warning = CatalogWarning::MalformedRecord {
            index: 1,
            id: Some("b".into()),
            reason: "missing field `title`".into(),
        };
        assert_eq!(
            warning.to_string(),
            "malformed record #1 (`b`): missing field `title`"
        );
    }
}
