//! Site configuration management for `prerender.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build/     # [build], [build.sitemap], [build.robots]
//! │   ├── content    # [content]
//! │   ├── pages      # [pages."<path>"]
//! │   ├── routes     # [[routes]]
//! │   └── site       # [site]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    BodyTarget, BuildSectionConfig, ContentSectionConfig, PageConfig, RenderStrategy, RouteConfig,
    SiteSectionConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands},
    core::RoutePath,
    log,
    utils::path::{normalize_path, resolve_from},
};
use anyhow::Result;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing prerender.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub site: SiteSectionConfig,

    pub build: BuildSectionConfig,

    pub content: ContentSectionConfig,

    /// Static business routes, in declared order.
    pub routes: Vec<RouteConfig>,

    /// Explicit metadata keyed by route path as written in the file.
    pub pages: BTreeMap<String, PageConfig>,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file.
    /// The project root is the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path =
            find_config_file(&cli.config).ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.apply_command_options(cli);

        // Raw paths must be checked before they are joined onto the root
        config.validate_paths()?;

        config.config_path = normalize_path(&config_path);
        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.resolve_paths(&root);

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    pub fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} are ignored:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Output directory (absolute after `load`).
    pub fn output_dir(&self) -> &Path {
        &self.build.output
    }

    /// Reference document for `patch`: `build.reference` or `<output>/index.html`.
    pub fn reference_path(&self) -> PathBuf {
        self.build
            .reference
            .clone()
            .unwrap_or_else(|| self.build.output.join("index.html"))
    }

    pub fn sitemap_path(&self) -> PathBuf {
        self.build.output.join(&self.build.sitemap.path)
    }

    pub fn robots_path(&self) -> PathBuf {
        self.build.output.join(&self.build.robots.path)
    }

    /// Explicit page records keyed by normalized route path.
    ///
    /// Keys that fail to parse are skipped; `validate` already reported them.
    pub fn pages_by_path(&self) -> FxHashMap<RoutePath, &PageConfig> {
        self.pages
            .iter()
            .filter_map(|(key, page)| RoutePath::parse(key).ok().map(|path| (path, page)))
            .collect()
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply global and command-specific CLI options.
    fn apply_command_options(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        Self::update_option(&mut self.build.output, cli.output.as_ref());
        if let Some(url) = &cli.site_url {
            self.site.url = Some(url.clone());
        }

        match &cli.command {
            Commands::Build { build_args } => {
                self.build.clean = build_args.clean;
                self.build.dry_run = build_args.dry_run;
                Self::update_option(&mut self.build.strategy, build_args.strategy.as_ref());
                Self::update_option(&mut self.build.minify, build_args.minify.as_ref());
            }
            Commands::Sitemap { minify } => {
                Self::update_option(&mut self.build.minify, minify.as_ref());
            }
            Commands::Routes { .. } | Commands::Verify { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path resolution
    // ========================================================================

    /// Resolve all config-relative paths against the project root.
    fn resolve_paths(&mut self, root: &Path) {
        self.root = root.to_path_buf();

        self.build.output = resolve_from(root, &self.build.output);
        for path in [&mut self.build.template, &mut self.build.reference, &mut self.content.source]
            .into_iter()
            .flatten()
        {
            *path = resolve_from(root, path);
        }
        for page in self.pages.values_mut() {
            if let Some(template) = page.template.as_mut() {
                *template = resolve_from(root, template);
            }
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Pre-validate paths before resolution.
    fn validate_paths(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.build.validate(&mut diag);
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Validate resolved configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.content.validate(&mut diag);
        for (index, route) in self.routes.iter().enumerate() {
            route.validate(index, &mut diag);
        }
        self.validate_pages(&mut diag);
        self.validate_output_location(&mut diag);
        self.validate_templates(&mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    fn validate_pages(&self, diag: &mut ConfigDiagnostics) {
        let mut seen: FxHashMap<RoutePath, &str> = FxHashMap::default();
        for (key, page) in &self.pages {
            page.validate(key, diag);
            if let Ok(path) = RoutePath::parse(key)
                && let Some(previous) = seen.insert(path.clone(), key)
            {
                diag.error_with_hint(
                    FieldPath::keyed("pages", key, "path"),
                    format!("`{key}` and `{previous}` both name route `{path}`"),
                    "keep one table per route",
                );
            }
        }
    }

    /// `--clean` removes the output directory, so it must not hold the project.
    fn validate_output_location(&self, diag: &mut ConfigDiagnostics) {
        if self.root.as_os_str().is_empty() {
            return;
        }
        let output = normalize_path(&self.build.output);
        let root = normalize_path(&self.root);
        if root.starts_with(&output) {
            diag.error_with_hint(
                BuildSectionConfig::OUTPUT,
                format!("output directory `{}` contains the project root", output.display()),
                "use a subdirectory such as \"dist\"",
            );
        }
    }

    fn validate_templates(&self, diag: &mut ConfigDiagnostics) {
        if let Some(template) = &self.build.template
            && !template.is_file()
        {
            diag.error(
                FieldPath::new("build.template"),
                format!("template `{}` not found", template.display()),
            );
        }
        for (key, page) in &self.pages {
            if let Some(template) = &page.template
                && !template.is_file()
            {
                diag.error(
                    FieldPath::keyed("pages", key, "template"),
                    format!("template `{}` not found", template.display()),
                );
            }
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with minimal required `[site]` fields.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = format!("[site]\nname = \"Marden SEO\"\nurl = \"https://mardenseo.com\"\n{extra}");
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Like `test_parse_config`, with paths resolved against `root`.
#[cfg(test)]
pub fn test_config_at(root: &Path, extra: &str) -> SiteConfig {
    let mut config = test_parse_config(extra);
    config.resolve_paths(root);
    config
}

// ============================================================================
// tests
// ============================================================================
