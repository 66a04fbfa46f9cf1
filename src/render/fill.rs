//! Template-fill strategy: substitute `{{marker}}`s in an HTML shell.
//!
//! | Marker            | Value                                   | Occurrences |
//! |-------------------|-----------------------------------------|-------------|
//! | `{{title}}`       | escaped title                           | exactly 1   |
//! | `{{description}}` | escaped description                     | exactly 1   |
//! | `{{canonical}}`   | escaped canonical URL                   | exactly 1   |
//! | `{{body}}`        | page body HTML                          | exactly 1   |
//! | `{{robots}}`      | robots directive                        | any         |
//! | `{{head}}`        | Open Graph, Twitter, keywords, JSON-LD  | any         |
//! | `{{lang}}`        | escaped site language                   | any         |
//! | `{{heading}}`     | escaped heading                         | any         |
//!
//! Substitution is a single left-to-right pass, so marker text inside a
//! substituted value is never expanded again.

use super::RenderError;
use super::head::{json_ld, robots_tag, social_tags};
use crate::embed::{Template, TemplateVars};
use crate::page::PageMetadata;
use crate::utils::html::{escape, escape_attr};
use std::borrow::Cow;

pub const REQUIRED_MARKERS: [&str; 4] = ["title", "description", "canonical", "body"];

/// Indentation for lines of the generated `{{head}}` block.
const HEAD_INDENT: &str = "\n    ";

/// Occurrences of `{{name}}` in `content`.
pub fn count_marker(content: &str, name: &str) -> usize {
    content.matches(&format!("{{{{{name}}}}}")).count()
}

/// Check the marker contract of a shell.
fn check_contract(template: &Template<PageVars>) -> Result<(), RenderError> {
    for marker in REQUIRED_MARKERS {
        let count = count_marker(template.content(), marker);
        if count != 1 {
            return Err(RenderError::TemplateContractViolation {
                template: template.name().to_string(),
                marker,
                count,
            });
        }
    }
    Ok(())
}

/// Values substituted into a shell for one page.
#[derive(Debug, Clone)]
pub struct PageVars {
    title: String,
    description: String,
    canonical: String,
    robots: &'static str,
    lang: String,
    heading: String,
    head: String,
    body: String,
}

impl PageVars {
    /// Build the values for `meta`, adapting to the markers `template` uses.
    ///
    /// Without a `{{robots}}` marker the robots tag moves into `{{head}}`;
    /// without `{{heading}}` a generated body starts with its own `<h1>`.
    pub fn new(meta: &PageMetadata, template: &str) -> Self {
        let robots_in_head = count_marker(template, "robots") == 0;
        let heading_in_body = count_marker(template, "heading") == 0;

        Self {
            title: escape(&meta.title).into_owned(),
            description: escape_attr(&meta.description).into_owned(),
            canonical: escape_attr(&meta.canonical_url).into_owned(),
            robots: meta.robots.content(),
            lang: escape_attr(&meta.language).into_owned(),
            heading: escape(&meta.heading).into_owned(),
            head: head_fragment(meta, robots_in_head),
            body: meta
                .body
                .clone()
                .unwrap_or_else(|| fallback_body(meta, heading_in_body)),
        }
    }

    fn value(&self, name: &str) -> Option<&str> {
        Some(match name {
            "title" => &self.title,
            "description" => &self.description,
            "canonical" => &self.canonical,
            "robots" => self.robots,
            "lang" => &self.lang,
            "heading" => &self.heading,
            "head" => &self.head,
            "body" => &self.body,
            _ => return None,
        })
    }
}

impl TemplateVars for PageVars {
    fn apply(&self, content: &str) -> String {
        substitute(content, |name| self.value(name).map(Cow::Borrowed))
    }
}

/// Render `meta` through `template`.
///
/// Fails when a required marker is missing or repeated, or when the page is
/// not indexable and the shell has nowhere to put the robots tag.
pub fn render_fill(template: &Template<PageVars>, meta: &PageMetadata) -> Result<String, RenderError> {
    check_contract(template)?;

    let content = template.content();
    if !meta.robots.is_indexable()
        && count_marker(content, "robots") == 0
        && count_marker(content, "head") == 0
    {
        return Err(RenderError::TemplateContractViolation {
            template: template.name().to_string(),
            marker: "robots",
            count: 0,
        });
    }

    Ok(template.render(&PageVars::new(meta, content)))
}

fn head_fragment(meta: &PageMetadata, with_robots: bool) -> String {
    let mut lines: Vec<String> = Vec::new();
    if with_robots {
        lines.push(robots_tag(meta).to_element().to_html());
    }
    lines.extend(social_tags(meta).iter().map(|tag| tag.to_element().to_html()));
    if let Some(script) = json_ld(meta) {
        lines.push(script.to_html());
    }
    lines.join(HEAD_INDENT)
}

fn fallback_body(meta: &PageMetadata, with_heading: bool) -> String {
    let description = format!("<p>{}</p>", escape(&meta.description));
    if with_heading {
        format!("<h1>{}</h1>\n{description}", escape(&meta.heading))
    } else {
        description
    }
}

/// Replace every known `{{name}}` in one pass; unknown markers stay as written.
fn substitute<'a>(content: &str, lookup: impl Fn(&str) -> Option<Cow<'a, str>>) -> String {
    let mut out = String::with_capacity(content.len() + 1024);
    let mut rest = content;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let value = after
            .find("}}")
            .and_then(|close| lookup(&after[..close]).map(|v| (v, close)));

        match value {
            Some((value, close)) => {
                out.push_str(&value);
                rest = &after[close + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RobotsDirective;
    use crate::embed::build::BASE_HTML;

    fn metadata() -> PageMetadata {
        PageMetadata {
            title: "Fish & Chips - Marden SEO".into(),
            description: "A \"quoted\" description".into(),
            explicit_description: true,
            canonical_url: "https://mardenseo.com/fish".into(),
            robots: RobotsDirective::IndexFollow,
            heading: "Fish & Chips".into(),
            body: None,
            structured_data: None,
            og_image: None,
            og_type: "website",
            keywords: vec![],
            language: "en".into(),
            site_name: "Marden SEO".into(),
        }
    }

    fn shell(content: &'static str) -> Template<PageVars> {
        Template::new("test.html", content)
    }

    const MINIMAL: &str = "<html><head><title>{{title}}</title>\
        <meta name=\"description\" content=\"{{description}}\">\
        <link rel=\"canonical\" href=\"{{canonical}}\">{{head}}</head>\
        <body>{{body}}</body></html>";

    #[test]
    fn test_fill_base_shell() {
        let html = render_fill(&BASE_HTML, &metadata()).unwrap();
        assert!(html.contains("<title>Fish &amp; Chips - Marden SEO</title>"));
        assert!(html.contains(r#"content="A &quot;quoted&quot; description""#));
        assert!(html.contains(r#"<link rel="canonical" href="https://mardenseo.com/fish">"#));
        assert!(html.contains(r#"<meta name="robots" content="index, follow">"#));
        assert!(html.contains("<h1>Fish &amp; Chips</h1>"));
        assert!(html.contains(r#"<html lang="en">"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_fill_explicit_body_is_raw() {
        let mut meta = metadata();
        meta.body = Some("<section><p>Hand-written</p></section>".into());
        let html = render_fill(&shell(MINIMAL), &meta).unwrap();
        assert!(html.contains("<body><section><p>Hand-written</p></section></body>"));
    }

    #[test]
    fn test_fill_missing_marker() {
        let template = shell("<title>{{title}}</title>{{description}}{{body}}");
        let err = render_fill(&template, &metadata()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::TemplateContractViolation { marker: "canonical", count: 0, .. }
        ));
    }

    #[test]
    fn test_fill_repeated_marker() {
        let template = shell("{{title}}{{title}}{{description}}{{canonical}}{{body}}");
        let err = render_fill(&template, &metadata()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::TemplateContractViolation { marker: "title", count: 2, .. }
        ));
    }

    #[test]
    fn test_fill_robots_goes_to_head() {
        let mut meta = metadata();
        meta.robots = RobotsDirective::NoindexNofollow;
        let html = render_fill(&shell(MINIMAL), &meta).unwrap();
        assert!(html.contains(r#"<meta name="robots" content="noindex, nofollow">"#));
        // Generated body carries the heading when the shell has no marker for it
        assert!(html.contains("<h1>Fish &amp; Chips</h1>"));
    }

    #[test]
    fn test_fill_noindex_without_slot() {
        let mut meta = metadata();
        meta.robots = RobotsDirective::NoindexFollow;
        let template = shell("{{title}}{{description}}{{canonical}}{{body}}");
        let err = render_fill(&template, &meta).unwrap_err();
        assert!(matches!(
            err,
            RenderError::TemplateContractViolation { marker: "robots", .. }
        ));
    }

    #[test]
    fn test_substitute_single_pass() {
        let out = substitute("a {{x}} {{unknown}} {{ b", |name| {
            (name == "x").then(|| Cow::Borrowed("{{x}}"))
        });
        assert_eq!(out, "a {{x}} {{unknown}} {{ b");
    }

    #[test]
    fn test_count_marker() {
        assert_eq!(count_marker("{{body}} {{body}} {{ body }}", "body"), 2);
    }
}
