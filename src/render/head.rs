//! Social and structured-data head tags shared by both strategies.

use super::dom::Element;
use crate::page::PageMetadata;
use crate::utils::html::escape_script;

/// A keyed `<meta>` tag: `<meta {attr}="{key}" content="...">`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaTag {
    pub attr: &'static str,
    pub key: &'static str,
    pub content: String,
}

impl MetaTag {
    fn new(attr: &'static str, key: &'static str, content: impl Into<String>) -> Self {
        Self {
            attr,
            key,
            content: content.into(),
        }
    }

    pub fn to_element(&self) -> Element {
        Element::new("meta")
            .with_attr(self.attr, self.key)
            .with_attr("content", self.content.as_str())
    }

    /// Whether `element` is the tag this one replaces.
    pub fn matches(&self, element: &Element) -> bool {
        element.tag == "meta" && element.attr_is(self.attr, self.key)
    }
}

/// Keywords, Open Graph and Twitter card tags.
pub fn social_tags(meta: &PageMetadata) -> Vec<MetaTag> {
    let mut tags = Vec::with_capacity(12);

    if !meta.keywords.is_empty() {
        tags.push(MetaTag::new("name", "keywords", meta.keywords.join(", ")));
    }

    tags.push(MetaTag::new("property", "og:title", meta.title.as_str()));
    tags.push(MetaTag::new("property", "og:description", meta.description.as_str()));
    tags.push(MetaTag::new("property", "og:type", meta.og_type));
    tags.push(MetaTag::new("property", "og:url", meta.canonical_url.as_str()));
    tags.push(MetaTag::new("property", "og:site_name", meta.site_name.as_str()));
    if let Some(image) = &meta.og_image {
        tags.push(MetaTag::new("property", "og:image", image.as_str()));
    }

    let card = if meta.og_image.is_some() {
        "summary_large_image"
    } else {
        "summary"
    };
    tags.push(MetaTag::new("name", "twitter:card", card));
    tags.push(MetaTag::new("name", "twitter:title", meta.title.as_str()));
    tags.push(MetaTag::new("name", "twitter:description", meta.description.as_str()));
    if let Some(image) = &meta.og_image {
        tags.push(MetaTag::new("name", "twitter:image", image.as_str()));
    }

    tags
}

/// Whether `element` is a keywords, Open Graph or Twitter meta tag, i.e. one
/// whose value belongs to a single page.
pub fn is_social_tag(element: &Element) -> bool {
    if element.tag != "meta" {
        return false;
    }
    let key = |attr: &str| element.attr(attr).map(str::to_ascii_lowercase);
    [key("name"), key("property")].into_iter().flatten().any(|k| {
        k == "keywords" || k.starts_with("og:") || k.starts_with("twitter:")
    })
}

pub fn robots_tag(meta: &PageMetadata) -> MetaTag {
    MetaTag::new("name", "robots", meta.robots.content())
}

/// `<script type="application/ld+json">` carrying the page's structured data.
pub fn json_ld(meta: &PageMetadata) -> Option<Element> {
    let data = meta.structured_data.as_ref()?;
    let mut script = Element::new("script").with_attr("type", "application/ld+json");
    script.set_raw_text(escape_script(&data.to_string()).into_owned());
    Some(script)
}

pub fn is_json_ld(element: &Element) -> bool {
    element.tag == "script" && element.attr_is("type", "application/ld+json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RobotsDirective;
    use serde_json::json;

    fn metadata() -> PageMetadata {
        PageMetadata {
            title: "About - Marden SEO".into(),
            description: "Who we are".into(),
            explicit_description: false,
            canonical_url: "https://mardenseo.com/about".into(),
            robots: RobotsDirective::IndexFollow,
            heading: "About".into(),
            body: None,
            structured_data: Some(json!({"@type": "WebPage", "name": "</script><b>"})),
            og_image: None,
            og_type: "website",
            keywords: vec![],
            language: "en".into(),
            site_name: "Marden SEO".into(),
        }
    }

    #[test]
    fn test_social_tags_without_image() {
        let tags = social_tags(&metadata());
        assert!(tags.iter().all(|t| t.key != "keywords" && t.key != "og:image"));
        let card = tags.iter().find(|t| t.key == "twitter:card").unwrap();
        assert_eq!(card.content, "summary");
    }

    #[test]
    fn test_social_tags_with_image_and_keywords() {
        let mut meta = metadata();
        meta.og_image = Some("https://mardenseo.com/og.png".into());
        meta.keywords = vec!["seo".into(), "audits".into()];
        let tags = social_tags(&meta);
        assert_eq!(tags[0].to_element().to_html(), r#"<meta name="keywords" content="seo, audits">"#);
        assert!(tags.iter().any(|t| t.key == "twitter:image"));
        assert_eq!(
            tags.iter().find(|t| t.key == "twitter:card").unwrap().content,
            "summary_large_image"
        );
    }

    #[test]
    fn test_is_social_tag() {
        let meta = |attr: &str, key: &str| Element::new("meta").with_attr(attr, key);
        assert!(is_social_tag(&meta("name", "keywords")));
        assert!(is_social_tag(&meta("property", "og:image:width")));
        assert!(is_social_tag(&meta("name", "Twitter:Site")));
        assert!(!is_social_tag(&meta("name", "description")));
        assert!(!is_social_tag(&meta("name", "viewport")));
        assert!(!is_social_tag(&Element::new("link").with_attr("property", "og:title")));
    }

    #[test]
    fn test_json_ld_escapes_closing_script() {
        let script = json_ld(&metadata()).unwrap();
        let html = script.to_html();
        assert!(html.starts_with(r#"<script type="application/ld+json">"#));
        assert!(html.contains(r"<\/script>"));
        assert!(is_json_ld(&script));
    }

    #[test]
    fn test_json_ld_absent() {
        let mut meta = metadata();
        meta.structured_data = None;
        assert!(json_ld(&meta).is_none());
    }
}
