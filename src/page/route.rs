//! Catalog route - one page of the generated site.

use crate::core::{ChangeFrequency, Priority, RoutePath};
use crate::utils::date::DateTimeUtc;

/// Where a route came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Declared in `[[routes]]`.
    Static,
    /// Synthesized from a content manifest record.
    Content,
}

impl RouteKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Content => "content",
        }
    }
}

/// A unit of generation.
///
/// # Example
///
/// ```text
/// [[routes]] path = "/about", priority = 0.8
///   -> Route { path: /about, priority: 0.8, kind: Static, .. }
///
/// posts.json { "id": "local-seo", "title": "Local SEO" }
///   -> Route { path: /blog/local-seo, priority: 0.7, kind: Content, .. }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: RoutePath,
    pub priority: Priority,
    pub changefreq: ChangeFrequency,
    pub last_modified: Option<DateTimeUtc>,
    /// Display title without the site name suffix.
    pub title: Option<String>,
    pub summary: Option<String>,
    pub kind: RouteKind,
    /// Declared `noindex` on a static route.
    pub noindex: bool,
}

impl Route {
    /// A static route with default sitemap values.
    pub fn new(path: RoutePath, kind: RouteKind) -> Self {
        Self {
            path,
            priority: Priority::DEFAULT,
            changefreq: ChangeFrequency::default(),
            last_modified: None,
            title: None,
            summary: None,
            kind,
            noindex: false,
        }
    }

    /// Title from the catalog, or one derived from the last path segment.
    ///
    /// `/workflow-automation` -> `Workflow Automation`; `None` for the root.
    pub fn display_title(&self) -> Option<String> {
        if let Some(title) = self.title.as_deref().map(str::trim)
            && !title.is_empty()
        {
            return Some(title.to_string());
        }
        self.path.last_segment().map(title_from_segment)
    }
}

/// `workflow-automation` -> `Workflow Automation`
pub fn title_from_segment(segment: &str) -> String {
    segment
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
