//! `[content]` section configuration.
//!
//! Where blog posts are declared and how their routes are synthesized.
//!
//! ```toml
//! [content]
//! source = "content/posts.json"   # JSON array / { posts = [...] } or TOML [[posts]]
//! prefix = "/blog"
//! priority = 0.7
//! changefreq = "weekly"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::{ChangeFrequency, RoutePath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSectionConfig {
    /// Content manifest. No dynamic routes when unset.
    pub source: Option<PathBuf>,

    /// Route prefix for posts (`/blog` -> `/blog/{id}`).
    pub prefix: String,

    /// Sitemap priority for posts without their own.
    pub priority: f32,

    /// Sitemap change frequency for posts without their own.
    pub changefreq: ChangeFrequency,
}

impl Default for ContentSectionConfig {
    fn default() -> Self {
        Self {
            source: None,
            prefix: "/blog".into(),
            priority: 0.7,
            changefreq: ChangeFrequency::Weekly,
        }
    }
}

impl ContentSectionConfig {
    pub const PREFIX: FieldPath = FieldPath::new("content.prefix");
    pub const PRIORITY: FieldPath = FieldPath::new("content.priority");

    /// Parsed post prefix; falls back to `/blog` when invalid (caught by `validate`).
    pub fn prefix_path(&self) -> RoutePath {
        RoutePath::parse(&self.prefix)
            .unwrap_or_else(|_| RoutePath::parse("/blog").unwrap_or_default())
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Err(e) = RoutePath::parse(&self.prefix) {
            diag.error_with_hint(Self::PREFIX, e.to_string(), "e.g. \"/blog\"");
        }
        if !(0.0..=1.0).contains(&self.priority) {
            diag.warn(
                Self::PRIORITY,
                format!("priority {} is outside 0.0..=1.0 and will be clamped", self.priority),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_path() {
        let config = ContentSectionConfig {
            prefix: "articles/".into(),
            ..Default::default()
        };
        assert_eq!(config.prefix_path().as_str(), "/articles");
        assert_eq!(ContentSectionConfig::default().prefix_path().as_str(), "/blog");
    }

    #[test]
    fn test_validate() {
        let config = ContentSectionConfig {
            prefix: "/blog/../x".into(),
            priority: 1.5,
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
        assert_eq!(diag.warnings().len(), 1);
    }
}
