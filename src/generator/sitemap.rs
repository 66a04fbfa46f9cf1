//! Sitemap generation.
//!
//! Pure function from indexable routes to sitemap XML.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <changefreq>weekly</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use crate::core::{ChangeFrequency, Priority};
use crate::page::Route;
use crate::utils::date::DateTimeUtc;
use std::borrow::Cow;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Absolute canonical URL.
    pub loc: String,
    /// `None` falls back to the generation date.
    pub lastmod: Option<DateTimeUtc>,
    pub changefreq: ChangeFrequency,
    pub priority: Priority,
}

impl SitemapEntry {
    pub fn from_route(route: &Route, loc: String) -> Self {
        Self {
            loc,
            lastmod: route.last_modified,
            changefreq: route.changefreq,
            priority: route.priority,
        }
    }
}

/// Render `<urlset>` for `entries`, in the given order.
pub fn emit_sitemap(entries: &[SitemapEntry], today: DateTimeUtc) -> String {
    let mut xml = String::with_capacity(256 + entries.len() * 160);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for entry in entries {
        let lastmod = entry.lastmod.unwrap_or(today).to_iso_date();
        xml.push_str("  <url>\n    <loc>");
        xml.push_str(&escape_xml(&entry.loc));
        xml.push_str("</loc>\n    <lastmod>");
        xml.push_str(&lastmod);
        xml.push_str("</lastmod>\n    <changefreq>");
        xml.push_str(entry.changefreq.as_str());
        xml.push_str("</changefreq>\n    <priority>");
        xml.push_str(&format!("{:.1}", entry.priority.value()));
        xml.push_str("</priority>\n  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TODAY: DateTimeUtc = DateTimeUtc::from_ymd(2025, 3, 14);

    fn entry(loc: &str, lastmod: Option<DateTimeUtc>) -> SitemapEntry {
        SitemapEntry {
            loc: loc.to_string(),
            lastmod,
            changefreq: ChangeFrequency::Weekly,
            priority: Priority::clamped(0.8).0,
        }
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }

    #[test]
    fn test_sitemap_empty() {
        let xml = emit_sitemap(&[], TODAY);

        assert!(xml.contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#)));
        assert!(xml.contains("</urlset>"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_sitemap_entry_fields() {
        let xml = emit_sitemap(
            &[entry("https://mardenseo.com/", Some(DateTimeUtc::from_ymd(2025, 1, 2)))],
            TODAY,
        );

        assert!(xml.contains("<loc>https://mardenseo.com/</loc>"));
        assert!(xml.contains("<lastmod>2025-01-02</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
    }

    #[test]
    fn test_sitemap_lastmod_defaults_to_today() {
        let xml = emit_sitemap(&[entry("https://mardenseo.com/about", None)], TODAY);
        assert!(xml.contains("<lastmod>2025-03-14</lastmod>"));
    }

    #[test]
    fn test_sitemap_one_loc_per_entry_in_order() {
        let entries = [
            entry("https://mardenseo.com/", None),
            entry("https://mardenseo.com/blog/a", None),
            entry("https://mardenseo.com/about?x=1&y=2", None),
        ];
        let xml = emit_sitemap(&entries, TODAY);

        assert_eq!(xml.matches("<loc>").count(), 3);
        assert!(xml.contains("<loc>https://mardenseo.com/about?x=1&amp;y=2</loc>"));
        let first = xml.find("/blog/a").unwrap();
        let second = xml.find("/about").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_sitemap_deterministic() {
        let entries = [entry("https://mardenseo.com/", None)];
        assert_eq!(emit_sitemap(&entries, TODAY), emit_sitemap(&entries, TODAY));
    }
}
