//! `[pages."<path>"]` explicit per-route metadata.
//!
//! ```toml
//! [pages."/about"]
//! title = "About Us - Marden SEO"
//! description = "Meet the team behind Marden SEO..."
//! heading = "About Marden SEO"
//! body = "<p>...</p>"
//! robots = "index-follow"
//! keywords = ["seo agency", "local seo"]
//! strategy = "patch"
//! structured_data = { "@type" = "AboutPage", name = "About Marden SEO" }
//! ```

use crate::config::{ConfigDiagnostics, FieldPath, RenderStrategy};
use crate::core::{RobotsDirective, RoutePath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Full `<title>`, used verbatim.
    pub title: Option<String>,
    pub description: Option<String>,
    /// First `<h1>` text.
    pub heading: Option<String>,
    /// Main content HTML, inserted unescaped.
    pub body: Option<String>,
    pub robots: Option<RobotsDirective>,
    /// Shell used instead of `build.template`.
    pub template: Option<PathBuf>,
    /// Strategy used instead of `build.strategy`.
    pub strategy: Option<RenderStrategy>,
    pub og_image: Option<String>,
    /// `<meta name="keywords">` entries.
    pub keywords: Vec<String>,
    /// JSON-LD object. `@context` is added when missing.
    pub structured_data: Option<serde_json::Value>,
}

impl PageConfig {
    pub fn validate(&self, key: &str, diag: &mut ConfigDiagnostics) {
        if let Err(e) = RoutePath::parse(key) {
            diag.error(FieldPath::keyed("pages", key, "path"), e.to_string());
        }
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            diag.error(FieldPath::keyed("pages", key, "title"), "title must not be empty");
        }
        if let Some(description) = &self.description
            && description.trim().is_empty()
        {
            diag.error_with_hint(
                FieldPath::keyed("pages", key, "description"),
                "description must not be empty",
                "remove the field to use the default description",
            );
        }
        if let Some(data) = &self.structured_data
            && !data.is_object()
        {
            diag.error(
                FieldPath::keyed("pages", key, "structured_data"),
                "structured data must be a table (JSON-LD object)",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_data_from_toml() {
        let page: PageConfig = toml::from_str(
            r#"
            description = "About us"
            robots = "noindex-follow"
            structured_data = { "@type" = "AboutPage", name = "About" }
            "#,
        )
        .unwrap();
        assert_eq!(page.robots, Some(RobotsDirective::NoindexFollow));
        let data = page.structured_data.unwrap();
        assert_eq!(data["@type"], "AboutPage");
    }

    #[test]
    fn test_validate_page() {
        let page = PageConfig {
            description: Some("  ".into()),
            structured_data: Some(serde_json::json!("not an object")),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        page.validate("/about", &mut diag);
        assert_eq!(diag.errors().len(), 2);

        let mut diag = ConfigDiagnostics::new();
        PageConfig::default().validate("/a/../b", &mut diag);
        assert_eq!(diag.errors().len(), 1);
    }
}
