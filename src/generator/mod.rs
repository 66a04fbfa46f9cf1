//! Side files generated next to the pages.
//!
//! - **Sitemap**: search engine indexing (`sitemap.xml`)
//! - **Robots**: crawler directives (`robots.txt`)
//!
//! Both are pure; writing happens in the pipeline.

pub mod robots;
pub mod sitemap;

pub use robots::emit_robots;
pub use sitemap::{SitemapEntry, emit_sitemap};

use std::borrow::Cow;

/// Minify XML content if enabled.
pub fn minify_xml(content: &str, enabled: bool) -> Cow<'_, str> {
    if enabled {
        let minified = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("");
        Cow::Owned(minified)
    } else {
        Cow::Borrowed(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_xml_basic() {
        let xml = r#"<?xml version="1.0"?>
<root>
  <item>Hello</item>
</root>"#;
        assert_eq!(
            minify_xml(xml, true),
            r#"<?xml version="1.0"?><root><item>Hello</item></root>"#
        );
    }

    #[test]
    fn test_minify_xml_removes_empty_lines() {
        assert_eq!(minify_xml("<root>\n\n  <item/>\n\n</root>", true), "<root><item/></root>");
    }

    #[test]
    fn test_minify_xml_disabled() {
        let xml = "<root>\n  <item/>\n</root>";
        assert_eq!(minify_xml(xml, false), xml);
    }
}
