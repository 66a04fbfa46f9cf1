//! Per-route SEO metadata.
//!
//! Every route resolves to exactly one `PageMetadata`: the explicit
//! `[pages."<path>"]` record where present, synthesized defaults otherwise.
//!
//! | Field       | Explicit              | Fallback                                   |
//! |-------------|-----------------------|--------------------------------------------|
//! | `title`     | verbatim              | `"{route title} - {site}"`, root: `{site}` |
//! | `description` | verbatim            | route summary, then `site.default_description` |
//! | `robots`    | verbatim              | `noindex` route -> noindex-nofollow        |
//! | `heading`   | verbatim              | route title, root: `{site}`                |
//! | `structured_data` | verbatim        | generated `WebPage` / `BlogPosting`        |

use super::route::{Route, RouteKind};
use crate::config::{PageConfig, SiteSectionConfig};
use crate::core::{RobotsDirective, RoutePath};
use rustc_hash::FxHashMap;
use serde_json::{Map, Value, json};
use std::ops::RangeInclusive;

/// Description length search engines display without truncation.
pub const RECOMMENDED_DESCRIPTION_LEN: RangeInclusive<usize> = 150..=160;

/// Resolved metadata for one route.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    /// Whether the description came from an explicit page record.
    pub explicit_description: bool,
    pub canonical_url: String,
    pub robots: RobotsDirective,
    pub heading: String,
    /// Main content HTML (trusted, inserted unescaped).
    pub body: Option<String>,
    pub structured_data: Option<Value>,
    /// Absolute Open Graph image URL.
    pub og_image: Option<String>,
    /// `website` or `article`.
    pub og_type: &'static str,
    pub keywords: Vec<String>,
    pub language: String,
    pub site_name: String,
}

/// Maps routes to metadata using the site defaults and explicit page records.
pub struct MetadataResolver<'a> {
    site: &'a SiteSectionConfig,
    pages: FxHashMap<RoutePath, &'a PageConfig>,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(site: &'a SiteSectionConfig, pages: FxHashMap<RoutePath, &'a PageConfig>) -> Self {
        Self { site, pages }
    }

    /// Explicit record for a path, if any.
    pub fn page(&self, path: &RoutePath) -> Option<&'a PageConfig> {
        self.pages.get(path).copied()
    }

    pub fn resolve(&self, route: &Route) -> PageMetadata {
        let page = self.page(&route.path);
        let site_name = self.site.name.as_str();
        let route_title = route.display_title();
        let short_title = route_title.as_deref().unwrap_or(site_name);

        let title = page
            .and_then(|p| p.title.clone())
            .unwrap_or_else(|| match &route_title {
                Some(t) => format!("{t} - {site_name}"),
                None => site_name.to_string(),
            });

        let explicit = page.and_then(|p| p.description.clone());
        let explicit_description = explicit.is_some();
        let description = explicit
            .or_else(|| route.summary.clone())
            .unwrap_or_else(|| {
                self.site
                    .default_description
                    .replace("{title}", short_title)
                    .replace("{site}", site_name)
            });

        let robots = page.and_then(|p| p.robots).unwrap_or(if route.noindex {
            RobotsDirective::NoindexNofollow
        } else {
            RobotsDirective::IndexFollow
        });

        let heading = page
            .and_then(|p| p.heading.clone())
            .unwrap_or_else(|| short_title.to_string());

        let og_image = page
            .and_then(|p| p.og_image.as_deref())
            .or(self.site.og_image.as_deref())
            .map(|image| self.site.absolute_url(image));

        let og_type = match route.kind {
            RouteKind::Static => "website",
            RouteKind::Content => "article",
        };

        let mut metadata = PageMetadata {
            title,
            description,
            explicit_description,
            canonical_url: route.path.canonical_url(self.site.base_url()),
            robots,
            heading,
            body: page.and_then(|p| p.body.clone()),
            structured_data: None,
            og_image,
            og_type,
            keywords: page.map(|p| p.keywords.clone()).unwrap_or_default(),
            language: self.site.language.clone(),
            site_name: site_name.to_string(),
        };

        metadata.structured_data = match page.and_then(|p| p.structured_data.clone()) {
            Some(data) => Some(with_context(data)),
            None if self.site.structured_data => Some(self.generate_structured_data(route, &metadata)),
            None => None,
        };
        metadata
    }

    fn publisher(&self) -> Value {
        let mut org = json!({
            "@type": "Organization",
            "name": self.site.name,
            "url": format!("{}/", self.site.base_url()),
        });
        if let Some(logo) = &self.site.logo {
            org["logo"] = json!({
                "@type": "ImageObject",
                "url": self.site.absolute_url(logo),
            });
        }
        org
    }

    fn generate_structured_data(&self, route: &Route, meta: &PageMetadata) -> Value {
        let mut data = match route.kind {
            RouteKind::Static => json!({
                "@context": "https://schema.org",
                "@type": "WebPage",
                "name": meta.title,
                "description": meta.description,
                "url": meta.canonical_url,
                "inLanguage": meta.language,
                "publisher": self.publisher(),
            }),
            RouteKind::Content => {
                let mut post = json!({
                    "@context": "https://schema.org",
                    "@type": "BlogPosting",
                    "headline": meta.heading,
                    "description": meta.description,
                    "url": meta.canonical_url,
                    "mainEntityOfPage": meta.canonical_url,
                    "inLanguage": meta.language,
                    "author": self.publisher(),
                    "publisher": self.publisher(),
                });
                if let Some(date) = route.last_modified {
                    post["datePublished"] = json!(date.to_iso_date());
                    post["dateModified"] = json!(date.to_iso_date());
                }
                post
            }
        };
        if let Some(image) = &meta.og_image {
            data["image"] = json!(image);
        }
        data
    }
}

/// Put `@context` first when the record does not carry one.
fn with_context(data: Value) -> Value {
    match data {
        Value::Object(map) if !map.contains_key("@context") => {
            let mut with = Map::new();
            with.insert("@context".into(), json!("https://schema.org"));
            with.extend(map);
            Value::Object(with)
        }
        other => other,
    }
}

// ============================================================================
// Description checks
// ============================================================================

/// Problem found by `check_descriptions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionIssue {
    /// The same explicit description on more than one route.
    Duplicate {
        description: String,
        paths: Vec<RoutePath>,
    },
    /// Explicit description outside the recommended length.
    Length { path: RoutePath, len: usize },
}

impl std::fmt::Display for DescriptionIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate { description, paths } => {
                let paths: Vec<&str> = paths.iter().map(RoutePath::as_str).collect();
                write!(f, "description \"{}\" shared by {}", description, paths.join(", "))
            }
            Self::Length { path, len } => write!(
                f,
                "description of `{}` is {} characters (recommended {}-{})",
                path,
                len,
                RECOMMENDED_DESCRIPTION_LEN.start(),
                RECOMMENDED_DESCRIPTION_LEN.end()
            ),
        }
    }
}

/// Check explicit descriptions: pairwise distinct and of recommended length.
///
/// Synthesized descriptions are exempt; near-duplicates among them are expected.
/// Issues are ordered: duplicates (by first occurrence), then lengths.
pub fn check_descriptions<'a>(
    resolved: impl IntoIterator<Item = (&'a RoutePath, &'a PageMetadata)>,
) -> Vec<DescriptionIssue> {
    let mut groups: Vec<(&str, Vec<RoutePath>)> = Vec::new();
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut lengths = Vec::new();

    for (path, meta) in resolved {
        if !meta.explicit_description {
            continue;
        }
        let description = meta.description.as_str();
        match index.get(description) {
            Some(&i) => groups[i].1.push(path.clone()),
            None => {
                index.insert(description, groups.len());
                groups.push((description, vec![path.clone()]));
            }
        }

        let len = description.chars().count();
        if !RECOMMENDED_DESCRIPTION_LEN.contains(&len) {
            lengths.push(DescriptionIssue::Length {
                path: path.clone(),
                len,
            });
        }
    }

    groups
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(description, paths)| DescriptionIssue::Duplicate {
            description: description.to_string(),
            paths,
        })
        .chain(lengths)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::DateTimeUtc;

    fn site() -> SiteSectionConfig {
        SiteSectionConfig {
            name: "Marden SEO".into(),
            url: Some("https://mardenseo.com".into()),
            default_description: "{title} - Expert SEO insights and strategies from {site}.".into(),
            og_image: Some("/og-image.jpg".into()),
            ..Default::default()
        }
    }

    fn route(path: &str, kind: RouteKind) -> Route {
        Route::new(RoutePath::parse(path).unwrap(), kind)
    }

    #[test]
    fn test_fallback_metadata() {
        let site = site();
        let resolver = MetadataResolver::new(&site, FxHashMap::default());

        let meta = resolver.resolve(&route("/workflow-automation", RouteKind::Static));
        assert_eq!(meta.title, "Workflow Automation - Marden SEO");
        assert_eq!(
            meta.description,
            "Workflow Automation - Expert SEO insights and strategies from Marden SEO."
        );
        assert!(!meta.explicit_description);
        assert_eq!(meta.canonical_url, "https://mardenseo.com/workflow-automation");
        assert_eq!(meta.robots, RobotsDirective::IndexFollow);
        assert_eq!(meta.heading, "Workflow Automation");
        assert_eq!(meta.og_image.as_deref(), Some("https://mardenseo.com/og-image.jpg"));
        assert_eq!(meta.og_type, "website");
    }

    #[test]
    fn test_root_fallback() {
        let site = site();
        let resolver = MetadataResolver::new(&site, FxHashMap::default());
        let meta = resolver.resolve(&route("/", RouteKind::Static));
        assert_eq!(meta.title, "Marden SEO");
        assert_eq!(meta.heading, "Marden SEO");
        assert_eq!(meta.canonical_url, "https://mardenseo.com/");
    }

    #[test]
    fn test_explicit_record_wins() {
        let site = site();
        let about = PageConfig {
            title: Some("About Us | Marden SEO".into()),
            description: Some("Meet the team.".into()),
            heading: Some("About Marden SEO".into()),
            body: Some("<p>Hi</p>".into()),
            robots: Some(RobotsDirective::NoindexFollow),
            keywords: vec!["seo".into()],
            ..Default::default()
        };
        let mut pages = FxHashMap::default();
        pages.insert(RoutePath::parse("/about").unwrap(), &about);
        let resolver = MetadataResolver::new(&site, pages);

        let meta = resolver.resolve(&route("/about", RouteKind::Static));
        assert_eq!(meta.title, "About Us | Marden SEO");
        assert_eq!(meta.description, "Meet the team.");
        assert!(meta.explicit_description);
        assert_eq!(meta.heading, "About Marden SEO");
        assert_eq!(meta.body.as_deref(), Some("<p>Hi</p>"));
        assert_eq!(meta.robots, RobotsDirective::NoindexFollow);
        assert_eq!(meta.keywords, ["seo"]);
    }

    #[test]
    fn test_noindex_route() {
        let site = site();
        let resolver = MetadataResolver::new(&site, FxHashMap::default());
        let mut cart = route("/cart", RouteKind::Static);
        cart.noindex = true;
        assert_eq!(resolver.resolve(&cart).robots, RobotsDirective::NoindexNofollow);
    }

    #[test]
    fn test_content_route_uses_entry() {
        let site = site();
        let resolver = MetadataResolver::new(&site, FxHashMap::default());
        let mut post = route("/blog/local-seo", RouteKind::Content);
        post.title = Some("Local SEO Guide".into());
        post.summary = Some("How to rank in your city.".into());
        post.last_modified = Some(DateTimeUtc::from_ymd(2025, 1, 15));

        let meta = resolver.resolve(&post);
        assert_eq!(meta.title, "Local SEO Guide - Marden SEO");
        assert_eq!(meta.description, "How to rank in your city.");
        assert_eq!(meta.og_type, "article");

        let data = meta.structured_data.unwrap();
        assert_eq!(data["@type"], "BlogPosting");
        assert_eq!(data["headline"], "Local SEO Guide");
        assert_eq!(data["datePublished"], "2025-01-15");
        assert_eq!(data["publisher"]["name"], "Marden SEO");
    }

    #[test]
    fn test_structured_data_webpage_and_explicit() {
        let site = site();
        let service = PageConfig {
            structured_data: Some(json!({"@type": "ProfessionalService", "name": "Marden SEO"})),
            ..Default::default()
        };
        let mut pages = FxHashMap::default();
        pages.insert(RoutePath::parse("/services").unwrap(), &service);
        let resolver = MetadataResolver::new(&site, pages);

        let data = resolver
            .resolve(&route("/about", RouteKind::Static))
            .structured_data
            .unwrap();
        assert_eq!(data["@type"], "WebPage");
        assert_eq!(data["url"], "https://mardenseo.com/about");

        let data = resolver
            .resolve(&route("/services", RouteKind::Static))
            .structured_data
            .unwrap();
        assert_eq!(data["@type"], "ProfessionalService");
        assert_eq!(data.as_object().unwrap().keys().next().unwrap(), "@context");
    }

    #[test]
    fn test_structured_data_disabled() {
        let site = SiteSectionConfig {
            structured_data: false,
            ..site()
        };
        let resolver = MetadataResolver::new(&site, FxHashMap::default());
        assert!(resolver.resolve(&route("/about", RouteKind::Static)).structured_data.is_none());
    }

    #[test]
    fn test_check_descriptions() {
        let site = site();
        let long = "x".repeat(155);
        let pages_cfg = [
            ("/", PageConfig { description: Some(long.clone()), ..Default::default() }),
            ("/about", PageConfig { description: Some(long.clone()), ..Default::default() }),
            ("/contact", PageConfig { description: Some("Too short".into()), ..Default::default() }),
        ];
        let pages = pages_cfg
            .iter()
            .map(|(p, c)| (RoutePath::parse(p).unwrap(), c))
            .collect();
        let resolver = MetadataResolver::new(&site, pages);

        let resolved: Vec<(RoutePath, PageMetadata)> = ["/", "/about", "/contact", "/services"]
            .iter()
            .map(|p| {
                let r = route(p, RouteKind::Static);
                let meta = resolver.resolve(&r);
                (r.path, meta)
            })
            .collect();

        let issues = check_descriptions(resolved.iter().map(|(p, m)| (p, m)));
        assert_eq!(issues.len(), 2);
        assert!(matches!(
            &issues[0],
            DescriptionIssue::Duplicate { paths, .. } if paths.len() == 2
        ));
        assert!(matches!(
            &issues[1],
            DescriptionIssue::Length { len: 9, .. }
        ));
    }

    #[test]
    fn test_distinct_descriptions_pass() {
        let site = site();
        let home = PageConfig {
            description: Some("a".repeat(150)),
            ..Default::default()
        };
        let about = PageConfig {
            description: Some("b".repeat(160)),
            ..Default::default()
        };
        let mut pages = FxHashMap::default();
        pages.insert(RoutePath::root(), &home);
        pages.insert(RoutePath::parse("/about").unwrap(), &about);
        let resolver = MetadataResolver::new(&site, pages);

        let resolved: Vec<_> = ["/", "/about"]
            .iter()
            .map(|p| {
                let r = route(p, RouteKind::Static);
                let meta = resolver.resolve(&r);
                (r.path, meta)
            })
            .collect();
        assert!(check_descriptions(resolved.iter().map(|(p, m)| (p, m))).is_empty());
    }
}
