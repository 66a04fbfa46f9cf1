//! Route path type for type-safe URL handling.
//!
//! - Internal representation: decoded, normalized (`/`, `/about`, `/blog/post`)
//! - Output boundary: percent-encoded for sitemap `<loc>` and canonical links

use std::borrow::Borrow;
use std::path::PathBuf;
use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Characters left untouched when encoding a path segment (RFC 3986 unreserved).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutePathError {
    #[error("route path `{0}` is empty")]
    Empty(String),
    #[error("route path `{0}` contains a `.` or `..` segment")]
    DotSegment(String),
    #[error("route path `{0}` contains a backslash")]
    Backslash(String),
}

/// Normalized route path
///
/// Invariants:
/// - Always decoded (no percent-encoding)
/// - Always starts with `/`
/// - Never ends with `/` unless it is the root
/// - No empty, `.` or `..` segments
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutePath(Arc<str>);

impl RoutePath {
    /// The site root `/`.
    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    /// Parse and normalize a declared route path.
    ///
    /// Strips query string and fragment, adds the leading slash, collapses
    /// repeated slashes and drops the trailing slash.
    pub fn parse(raw: &str) -> Result<Self, RoutePathError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RoutePathError::Empty(raw.to_string()));
        }
        if trimmed.contains('\\') {
            return Err(RoutePathError::Backslash(raw.to_string()));
        }

        let path = trimmed.split(['?', '#']).next().unwrap_or(trimmed);

        let mut segments = Vec::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." {
                return Err(RoutePathError::DotSegment(raw.to_string()));
            }
            segments.push(segment);
        }

        if segments.is_empty() {
            return Ok(Self::root());
        }
        Ok(Self(Arc::from(format!("/{}", segments.join("/")))))
    }

    /// Join a single child segment (used for `/blog` + `slug`).
    pub fn join(&self, segment: &str) -> Result<Self, RoutePathError> {
        Self::parse(&format!("{}/{}", self.0.trim_end_matches('/'), segment))
    }

    /// Get the decoded path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.as_ref() == "/"
    }

    /// Path segments without slashes; empty for the root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Last path segment (`/blog/local-seo` -> `local-seo`).
    pub fn last_segment(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Encode for output (percent-encode each segment).
    pub fn to_encoded(&self) -> String {
        if self.is_root() {
            return "/".to_string();
        }
        self.segments()
            .map(|segment| format!("/{}", utf8_percent_encode(segment, SEGMENT)))
            .collect()
    }

    /// Absolute canonical URL: `{base}{path}`, root keeps its slash.
    ///
    /// `base` is the site URL without trailing slash.
    pub fn canonical_url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.to_encoded())
    }

    /// Output location relative to the output directory.
    ///
    /// `/` -> `index.html`, `/about` -> `about/index.html`
    pub fn relative_output(&self) -> PathBuf {
        let mut path: PathBuf = self.segments().collect();
        path.push("index.html");
        path
    }

    /// Whether `self` equals `other` or lives below it.
    pub fn is_within(&self, other: &Self) -> bool {
        other.is_root()
            || self == other
            || self
                .0
                .strip_prefix(other.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl std::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for RoutePath {
    fn default() -> Self {
        Self::root()
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RoutePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for RoutePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl TryFrom<&str> for RoutePath {
    type Error = RoutePathError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn path(s: &str) -> RoutePath {
        RoutePath::parse(s).unwrap()
    }

    #[test]
    fn test_parse_normalizes_slashes() {
        assert_eq!(path("/").as_str(), "/");
        assert_eq!(path("about").as_str(), "/about");
        assert_eq!(path("/about/").as_str(), "/about");
        assert_eq!(path("//blog///post/").as_str(), "/blog/post");
        assert_eq!(path("  /contact ").as_str(), "/contact");
    }

    #[test]
    fn test_parse_strips_query_and_fragment() {
        assert_eq!(path("/services?ref=nav").as_str(), "/services");
        assert_eq!(path("/about#team").as_str(), "/about");
        assert!(path("?q=1").is_root());
    }

    #[test]
    fn test_parse_rejects_bad_paths() {
        assert!(matches!(RoutePath::parse(""), Err(RoutePathError::Empty(_))));
        assert!(matches!(
            RoutePath::parse("/blog/../etc"),
            Err(RoutePathError::DotSegment(_))
        ));
        assert!(matches!(
            RoutePath::parse("/a\\b"),
            Err(RoutePathError::Backslash(_))
        ));
    }

    #[test]
    fn test_join() {
        let blog = path("/blog");
        assert_eq!(blog.join("local-seo").unwrap().as_str(), "/blog/local-seo");
        assert_eq!(RoutePath::root().join("about").unwrap().as_str(), "/about");
        assert!(blog.join("..").is_err());
    }

    #[test]
    fn test_canonical_url() {
        let base = "https://example.com";
        assert_eq!(RoutePath::root().canonical_url(base), "https://example.com/");
        assert_eq!(path("/about").canonical_url(base), "https://example.com/about");
        assert_eq!(
            path("/about").canonical_url("https://example.com/"),
            "https://example.com/about"
        );
    }

    #[test]
    fn test_to_encoded() {
        assert_eq!(path("/blog/local-seo_2025").to_encoded(), "/blog/local-seo_2025");
        assert_eq!(path("/blog/café").to_encoded(), "/blog/caf%C3%A9");
        assert_eq!(path("/a b").to_encoded(), "/a%20b");
    }

    #[test]
    fn test_relative_output() {
        assert_eq!(RoutePath::root().relative_output(), Path::new("index.html"));
        assert_eq!(path("/about").relative_output(), Path::new("about/index.html"));
        assert_eq!(
            path("/blog/post").relative_output(),
            Path::new("blog/post/index.html")
        );
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(RoutePath::root().last_segment(), None);
        assert_eq!(path("/blog/local-seo").last_segment(), Some("local-seo"));
    }

    #[test]
    fn test_is_within() {
        assert!(path("/blog/a").is_within(&path("/blog")));
        assert!(path("/blog").is_within(&path("/blog")));
        assert!(!path("/blogroll").is_within(&path("/blog")));
        assert!(path("/anything").is_within(&RoutePath::root()));
    }
}
