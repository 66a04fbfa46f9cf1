//! `[build]` section configuration.
//!
//! Output location, render strategy and the emitted side files.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "dist"                 # Output directory (relative to site root)
//! strategy = "fill"               # fill | patch
//! template = "templates/base.html" # Shell for `fill` (default: built-in shell)
//! reference = "dist/index.html"   # Document cloned by `patch` (default: <output>/index.html)
//! body_target = "main"            # Element replaced by page body in `patch` (tag or #id)
//! minify = false                  # Minify sitemap XML
//!
//! [build.sitemap]
//! enable = true
//! path = "sitemap.xml"
//!
//! [build.robots]
//! enable = true
//! disallow = ["/api/"]
//! crawl_delay = 1
//! blocked_agents = ["AhrefsBot", "MJ12bot", "DotBot"]
//! ```

mod robots;
mod sitemap;

pub use robots::RobotsConfig;
pub use sitemap::SitemapConfig;

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// How a page document is produced.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RenderStrategy {
    /// Substitute markers in an HTML shell.
    #[default]
    Fill,
    /// Clone a reference document and patch its head and body.
    Patch,
}

impl RenderStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Patch => "patch",
        }
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element replaced with explicit page body under `patch`.
///
/// Written as a tag name (`main`) or an id selector (`#content`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BodyTarget {
    Tag(String),
    Id(String),
}

impl Default for BodyTarget {
    fn default() -> Self {
        Self::Tag("main".into())
    }
}

impl TryFrom<String> for BodyTarget {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim();
        if let Some(id) = value.strip_prefix('#') {
            if id.is_empty() || id.contains(char::is_whitespace) {
                return Err(format!("invalid id selector `{value}`"));
            }
            return Ok(Self::Id(id.to_string()));
        }
        let valid_tag = value
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid_tag {
            return Err(format!("`{value}` is neither a tag name nor an #id"));
        }
        Ok(Self::Tag(value.to_ascii_lowercase()))
    }
}

impl From<BodyTarget> for String {
    fn from(target: BodyTarget) -> Self {
        target.to_string()
    }
}

impl fmt::Display for BodyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.write_str(tag),
            Self::Id(id) => write!(f, "#{id}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Build output directory.
    pub output: PathBuf,

    /// Default render strategy.
    pub strategy: RenderStrategy,

    /// HTML shell for `fill`. Built-in shell when unset.
    pub template: Option<PathBuf>,

    /// Reference document for `patch`. `<output>/index.html` when unset.
    pub reference: Option<PathBuf>,

    /// Element replaced by explicit page bodies under `patch`.
    pub body_target: BodyTarget,

    /// Minify generated XML.
    pub minify: bool,

    /// Remove the output directory before building (CLI only).
    #[serde(skip)]
    pub clean: bool,

    /// Render without writing (CLI only).
    #[serde(skip)]
    pub dry_run: bool,

    pub sitemap: SitemapConfig,

    pub robots: RobotsConfig,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            output: "dist".into(),
            strategy: RenderStrategy::Fill,
            template: None,
            reference: None,
            body_target: BodyTarget::default(),
            minify: false,
            clean: false,
            dry_run: false,
            sitemap: SitemapConfig::default(),
            robots: RobotsConfig::default(),
        }
    }
}

impl BuildSectionConfig {
    pub const OUTPUT: FieldPath = FieldPath::new("build.output");
    pub const SITEMAP_PATH: FieldPath = FieldPath::new("build.sitemap.path");
    pub const ROBOTS_PATH: FieldPath = FieldPath::new("build.robots.path");
    pub const ROBOTS_DISALLOW: FieldPath = FieldPath::new("build.robots.disallow");

    /// Validate raw (unresolved) build paths and rules.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.output.as_os_str().is_empty() {
            diag.error(Self::OUTPUT, "output directory must not be empty");
        }

        for (field, path) in [
            (Self::SITEMAP_PATH, &self.sitemap.path),
            (Self::ROBOTS_PATH, &self.robots.path),
        ] {
            if !is_plain_relative(path) {
                diag.error_with_hint(
                    field,
                    format!("`{}` must be a relative path inside the output directory", path.display()),
                    "e.g. \"sitemap.xml\"",
                );
            }
        }

        for rule in &self.robots.disallow {
            if !rule.starts_with('/') {
                diag.error_with_hint(
                    Self::ROBOTS_DISALLOW,
                    format!("rule `{rule}` must start with `/`"),
                    "e.g. \"/api/\"",
                );
            }
        }
    }
}

/// Relative, non-empty, and without `..` or root components.
fn is_plain_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_target_parse() {
        assert_eq!(
            BodyTarget::try_from("main".to_string()).unwrap(),
            BodyTarget::Tag("main".into())
        );
        assert_eq!(
            BodyTarget::try_from("#content".to_string()).unwrap(),
            BodyTarget::Id("content".into())
        );
        assert!(BodyTarget::try_from("#".to_string()).is_err());
        assert!(BodyTarget::try_from("div.main".to_string()).is_err());
        assert!(BodyTarget::try_from(String::new()).is_err());
    }

    #[test]
    fn test_body_target_display() {
        assert_eq!(BodyTarget::Id("app".into()).to_string(), "#app");
        assert_eq!(BodyTarget::default().to_string(), "main");
    }

    #[test]
    fn test_strategy_from_toml() {
        #[derive(Deserialize)]
        struct Wrap {
            strategy: RenderStrategy,
        }
        let parsed: Wrap = toml::from_str("strategy = \"patch\"").unwrap();
        assert_eq!(parsed.strategy, RenderStrategy::Patch);
        assert!(toml::from_str::<Wrap>("strategy = \"clone\"").is_err());
    }

    #[test]
    fn test_validate_side_file_paths() {
        let mut config = BuildSectionConfig::default();
        config.sitemap.path = "../sitemap.xml".into();
        config.robots.disallow = vec!["api".into(), "/admin".into()];

        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.errors().len(), 2);
    }

    #[test]
    fn test_defaults() {
        let config = BuildSectionConfig::default();
        assert_eq!(config.output, PathBuf::from("dist"));
        assert_eq!(config.strategy, RenderStrategy::Fill);
        assert!(config.sitemap.enable);
        assert!(config.robots.enable);
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(!diag.has_errors());
    }
}
