//! `[site]` section configuration.
//!
//! Identity of the site: name, canonical origin, language and the defaults
//! the metadata resolver falls back to.
//!
//! # Example
//!
//! ```toml
//! [site]
//! name = "Marden SEO"
//! url = "https://mardenseo.com"
//! language = "en"
//! default_description = "{title} - Expert SEO insights and strategies from {site}."
//! structured_data = true
//! og_image = "/og-image.png"
//! logo = "/logo.png"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Site name, appended to page titles and used as publisher.
    pub name: String,

    /// Canonical origin (`https://example.com`), no trailing slash needed.
    pub url: Option<String>,

    /// `<html lang>` value.
    pub language: String,

    /// Fallback description pattern. `{title}` and `{site}` are substituted.
    pub default_description: String,

    /// Generate `WebPage`/`BlogPosting` JSON-LD for pages without their own.
    pub structured_data: bool,

    /// Default Open Graph image (absolute URL or site-relative path).
    pub og_image: Option<String>,

    /// Publisher logo for structured data (absolute URL or site-relative path).
    pub logo: Option<String>,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: None,
            language: "en".into(),
            default_description: "{title} - {site}".into(),
            structured_data: true,
            og_image: None,
            logo: None,
        }
    }
}

impl SiteSectionConfig {
    pub const URL: FieldPath = FieldPath::new("site.url");
    pub const NAME: FieldPath = FieldPath::new("site.name");
    pub const LANGUAGE: FieldPath = FieldPath::new("site.language");
    pub const DEFAULT_DESCRIPTION: FieldPath = FieldPath::new("site.default_description");

    /// Site origin without trailing slash. Empty when unset (caught by `validate`).
    pub fn base_url(&self) -> &str {
        self.url.as_deref().unwrap_or_default().trim_end_matches('/')
    }

    /// Turn a site-relative asset path into an absolute URL.
    pub fn absolute_url(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else {
            format!("{}/{}", self.base_url(), path_or_url.trim_start_matches('/'))
        }
    }

    /// Validate site configuration.
    ///
    /// # Checks
    /// - `url` is set, parses, uses http(s) and has a host
    /// - `name` and `language` are non-empty
    /// - `default_description` is non-empty
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match &self.url {
            None => diag.error_with_hint(
                Self::URL,
                "site URL is required for canonical links and the sitemap",
                "set `url = \"https://example.com\"` or pass --site-url",
            ),
            Some(url_str) => match url::Url::parse(url_str) {
                Ok(parsed) => {
                    if !matches!(parsed.scheme(), "http" | "https") {
                        diag.error_with_hint(
                            Self::URL,
                            format!(
                                "scheme '{}' not supported, must be http or https",
                                parsed.scheme()
                            ),
                            "use format like https://example.com",
                        );
                    }
                    if parsed.host_str().is_none() {
                        diag.error_with_hint(
                            Self::URL,
                            "URL must have a valid host",
                            "use format like https://example.com",
                        );
                    }
                    if parsed.query().is_some() || parsed.fragment().is_some() {
                        diag.error(Self::URL, "URL must not carry a query or fragment");
                    }
                }
                Err(e) => diag.error_with_hint(
                    Self::URL,
                    format!("invalid URL: {e}"),
                    "use format like https://example.com",
                ),
            },
        }

        if self.name.trim().is_empty() {
            diag.error(Self::NAME, "site name must not be empty");
        }
        if self.language.trim().is_empty() {
            diag.error(Self::LANGUAGE, "language must not be empty");
        }
        if self.default_description.trim().is_empty() {
            diag.error_with_hint(
                Self::DEFAULT_DESCRIPTION,
                "fallback description must not be empty",
                "e.g. \"{title} - Expert insights from {site}.\"",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(url: &str) -> SiteSectionConfig {
        SiteSectionConfig {
            name: "Marden SEO".into(),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    fn errors(config: &SiteSectionConfig) -> usize {
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        diag.errors().len()
    }

    #[test]
    fn test_valid_site() {
        assert_eq!(errors(&site("https://mardenseo.com")), 0);
        assert_eq!(errors(&site("http://localhost:8080")), 0);
    }

    #[test]
    fn test_invalid_urls() {
        assert_eq!(errors(&site("ftp://example.com")), 1);
        assert_eq!(errors(&site("not a url")), 1);
        assert_eq!(errors(&site("https://example.com/?a=1")), 1);
        let missing = SiteSectionConfig {
            name: "x".into(),
            ..Default::default()
        };
        assert_eq!(errors(&missing), 1);
    }

    #[test]
    fn test_empty_name() {
        let config = SiteSectionConfig {
            name: " ".into(),
            ..site("https://example.com")
        };
        assert_eq!(errors(&config), 1);
    }

    #[test]
    fn test_base_url_and_absolute_url() {
        let config = site("https://example.com/");
        assert_eq!(config.base_url(), "https://example.com");
        assert_eq!(config.absolute_url("/og.png"), "https://example.com/og.png");
        assert_eq!(config.absolute_url("img/og.png"), "https://example.com/img/og.png");
        assert_eq!(
            config.absolute_url("https://cdn.example.com/og.png"),
            "https://cdn.example.com/og.png"
        );
    }
}
