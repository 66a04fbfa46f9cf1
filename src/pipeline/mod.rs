//! Generation pipeline.
//!
//! ```text
//! catalog -> metadata -> prune -> render + write (rayon) -> sitemap, robots.txt
//! ```
//!
//! `BuildContext` carries everything a route needs (config, loaded templates,
//! reference document, generation date, cancel flag). Workers share it
//! read-only and return a `RouteOutcome`; outcomes are folded into
//! `BuildStats` once the parallel phase is over.

mod stats;

pub use stats::{BuildStats, RouteOutcome};

use crate::config::{PageConfig, RenderStrategy, SiteConfig};
use crate::core::{CancelFlag, RoutePath};
use crate::embed::Template;
use crate::embed::build::BASE_HTML;
use crate::generator::{SitemapEntry, emit_robots, emit_sitemap, minify_xml};
use crate::logger::ProgressLine;
use crate::output::{
    WriteError, clean_output, output_path, prune, remove_pages, write_file, write_page,
};
use crate::page::{
    Catalog, CatalogWarning, MetadataResolver, PageMetadata, Route, build_catalog,
    check_descriptions,
};
use crate::render::{Document, PageVars, RenderError, Strategy, render};
use crate::utils::date::DateTimeUtc;
use crate::utils::path::display_relative;
use crate::utils::plural_count;
use crate::{debug, log};
use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Plan
// ============================================================================

/// Catalog plus the metadata resolved for each of its routes (same order).
pub struct Plan {
    pub catalog: Catalog,
    pub metadata: Vec<PageMetadata>,
}

impl Plan {
    pub fn new(config: &SiteConfig) -> Self {
        let catalog = build_catalog(&config.routes, &config.content);
        let resolver = MetadataResolver::new(&config.site, config.pages_by_path());
        let metadata = catalog.routes.iter().map(|route| resolver.resolve(route)).collect();
        Self { catalog, metadata }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Route, &PageMetadata)> {
        self.catalog.routes.iter().zip(&self.metadata)
    }

    /// Content records dropped while building the catalog.
    pub fn skipped(&self) -> usize {
        self.catalog
            .warnings
            .iter()
            .filter(|w| {
                matches!(
                    w,
                    CatalogWarning::MalformedRecord { .. } | CatalogWarning::InvalidPath { .. }
                )
            })
            .count()
    }

    /// Log catalog warnings and description problems.
    pub fn report_warnings(&self) {
        for warning in &self.catalog.warnings {
            log!("warning"; "{}", warning);
        }
        let resolved = self.iter().map(|(route, meta)| (&route.path, meta));
        for issue in check_descriptions(resolved) {
            log!("warning"; "{}", issue);
        }
    }
}

// ============================================================================
// Context
// ============================================================================

/// Read-only state shared by all route workers.
pub struct BuildContext<'a> {
    pub config: &'a SiteConfig,
    /// Generation date, used as `lastmod` fallback.
    pub today: DateTimeUtc,
    pub cancel: CancelFlag,
    /// Suppress the progress line.
    pub quiet: bool,
    pages: FxHashMap<RoutePath, &'a PageConfig>,
    template: Template<PageVars>,
    page_templates: FxHashMap<PathBuf, Template<PageVars>>,
    reference: Option<Document>,
}

impl<'a> BuildContext<'a> {
    /// Load templates and, when any route is patched, the reference document.
    ///
    /// Loading happens before the output directory is touched, so a reference
    /// inside it survives `--clean` and pruning.
    pub fn new(config: &'a SiteConfig, cancel: CancelFlag) -> Result<Self> {
        let template = match &config.build.template {
            Some(path) => load_template(path)?,
            None => BASE_HTML,
        };

        let mut page_templates = FxHashMap::default();
        for page in config.pages.values() {
            if let Some(path) = &page.template
                && !page_templates.contains_key(path)
            {
                page_templates.insert(path.clone(), load_template(path)?);
            }
        }

        let reference = if uses_patch(config) {
            Some(load_reference(&config.reference_path())?)
        } else {
            None
        };

        Ok(Self {
            config,
            today: DateTimeUtc::now(),
            cancel,
            quiet: false,
            pages: config.pages_by_path(),
            template,
            page_templates,
            reference,
        })
    }

    pub fn with_today(mut self, today: DateTimeUtc) -> Self {
        self.today = today;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Strategy configured for `path`: page override, else `[build]`.
    pub fn strategy_kind(&self, path: &RoutePath) -> RenderStrategy {
        self.pages
            .get(path)
            .and_then(|page| page.strategy)
            .unwrap_or(self.config.build.strategy)
    }

    fn strategy(&self, path: &RoutePath) -> Result<Strategy<'_>, RenderError> {
        match self.strategy_kind(path) {
            RenderStrategy::Fill => {
                let template = self
                    .pages
                    .get(path)
                    .and_then(|page| page.template.as_ref())
                    .and_then(|t| self.page_templates.get(t))
                    .unwrap_or(&self.template);
                Ok(Strategy::Fill(template))
            }
            RenderStrategy::Patch => {
                let reference = self
                    .reference
                    .as_ref()
                    .ok_or_else(|| RenderError::MissingNode("reference document".into()))?;
                Ok(Strategy::Patch {
                    reference,
                    body_target: &self.config.build.body_target,
                })
            }
        }
    }

    fn process(&self, route: &Route, metadata: &PageMetadata) -> RouteOutcome {
        if self.cancel.is_cancelled() {
            return RouteOutcome::Pending;
        }

        let html = match self
            .strategy(&route.path)
            .and_then(|strategy| render(route, metadata, &strategy))
        {
            Ok(html) => html,
            Err(e) => return RouteOutcome::Failed(e.into()),
        };

        if self.config.build.dry_run {
            debug!("dry-run"; "{} ({} bytes)", route.path, html.len());
            return RouteOutcome::Rendered;
        }

        match write_page(self.config.output_dir(), &route.path, &html) {
            Ok(path) => RouteOutcome::Written(path),
            Err(e) => RouteOutcome::Failed(e.into()),
        }
    }
}

fn uses_patch(config: &SiteConfig) -> bool {
    config.build.strategy == RenderStrategy::Patch
        || config
            .pages
            .values()
            .any(|page| page.strategy == Some(RenderStrategy::Patch))
}

fn load_template(path: &Path) -> Result<Template<PageVars>> {
    Template::load(path).with_context(|| format!("cannot read template {}", path.display()))
}

fn load_reference(path: &Path) -> Result<Document> {
    let html = fs::read_to_string(path).with_context(|| {
        format!(
            "cannot read reference document {} (build the app first or set `build.reference`)",
            path.display()
        )
    })?;
    Document::parse(&html).with_context(|| format!("cannot parse reference document {}", path.display()))
}

// ============================================================================
// Run
// ============================================================================

/// Run a full generation.
///
/// Per-route failures are counted, not returned; `Err` means the run could
/// not start (empty catalog, output directory unusable) or the side files
/// could not be written.
pub fn run_build(ctx: &BuildContext<'_>) -> Result<BuildStats> {
    let config = ctx.config;
    let plan = Plan::new(config);
    plan.report_warnings();

    if plan.catalog.is_empty() {
        bail!("no routes to render: declare [[routes]] or a [content] source");
    }

    let mut stats = BuildStats {
        discovered: plan.catalog.len(),
        skipped: plan.skipped(),
        ..Default::default()
    };

    if !config.build.dry_run {
        stats.pruned = prepare_output(config, &plan.catalog)?;
    }

    let progress = (!ctx.quiet).then(|| ProgressLine::new(&[("pages", plan.catalog.len())]));

    let outcomes: Vec<RouteOutcome> = plan
        .catalog
        .routes
        .par_iter()
        .zip(plan.metadata.par_iter())
        .map(|(route, metadata)| {
            let outcome = ctx.process(route, metadata);
            if let Some(progress) = &progress {
                progress.inc("pages");
            }
            outcome
        })
        .collect();

    if let Some(progress) = progress {
        progress.finish();
    }

    for ((route, _), outcome) in plan.iter().zip(&outcomes) {
        if let RouteOutcome::Failed(e) = outcome {
            log!("error"; "{}: {}", route.path, e);
        }
        stats.record(outcome);
    }

    if !config.build.dry_run {
        stats.pruned += remove_failed_output(config, &plan, &outcomes)?;
    }

    if stats.is_cancelled() {
        log!("build"; "cancelled, sitemap and robots.txt left untouched");
    } else if !config.build.dry_run {
        let rendered: Vec<_> = plan
            .iter()
            .zip(&outcomes)
            .filter(|(_, outcome)| outcome.is_rendered())
            .map(|(pair, _)| pair)
            .collect();
        write_side_files(config, &rendered, ctx.today)?;
    }

    log!("build"; "{}", stats.summary());
    Ok(stats)
}

/// Clean or prune the output directory. Returns the number of pruned pages.
fn prepare_output(config: &SiteConfig, catalog: &Catalog) -> Result<usize> {
    let output_dir = config.output_dir();

    if config.build.clean {
        clean_output(output_dir)?;
        debug!("build"; "removed {}", output_dir.display());
        return Ok(0);
    }

    let mut keep = catalog.paths();
    // The app's own entry document is not ours to remove
    if is_reference_root(config) {
        keep.insert(RoutePath::root());
    }

    let report = prune(output_dir, &keep)
        .with_context(|| format!("cannot prune {}", output_dir.display()))?;
    if !report.removed.is_empty() {
        log!("prune"; "removed {}", plural_count(report.removed.len(), "stale page"));
    }
    Ok(report.removed.len())
}

/// Remove pages a previous run wrote for routes that failed this time, so the
/// output never serves a page the new sitemap leaves out.
fn remove_failed_output(
    config: &SiteConfig,
    plan: &Plan,
    outcomes: &[RouteOutcome],
) -> Result<usize> {
    let output_dir = config.output_dir();
    let keep_root = is_reference_root(config);
    let failed = plan
        .iter()
        .zip(outcomes)
        .filter(|(_, outcome)| matches!(outcome, RouteOutcome::Failed(_)))
        .map(|((route, _), _)| &route.path)
        .filter(|path| !(keep_root && path.is_root()));

    let removed = remove_pages(output_dir, failed)
        .with_context(|| format!("cannot prune {}", output_dir.display()))?;
    if !removed.is_empty() {
        log!("prune"; "removed {} of failed routes", plural_count(removed.len(), "previous page"));
    }
    Ok(removed.len())
}

/// Whether the reference document is the root page of the output directory.
fn is_reference_root(config: &SiteConfig) -> bool {
    config.reference_path() == output_path(config.output_dir(), &RoutePath::root())
}

/// Write `sitemap.xml` and `robots.txt` for the given routes.
///
/// Noindex routes are left out of the sitemap and disallowed in robots.txt.
pub fn write_side_files(
    config: &SiteConfig,
    routes: &[(&Route, &PageMetadata)],
    today: DateTimeUtc,
) -> Result<(), WriteError> {
    let root = config.get_root();

    if config.build.sitemap.enable {
        let entries: Vec<SitemapEntry> = routes
            .iter()
            .filter(|(_, meta)| meta.robots.is_indexable())
            .map(|(route, meta)| SitemapEntry::from_route(route, meta.canonical_url.clone()))
            .collect();
        let xml = emit_sitemap(&entries, today);
        let path = config.sitemap_path();
        write_file(&path, &minify_xml(&xml, config.build.minify))?;
        log!("sitemap"; "{} -> {}", plural_count(entries.len(), "url"), display_relative(&path, root));
    }

    if config.build.robots.enable {
        let disallowed: Vec<RoutePath> = routes
            .iter()
            .filter(|(_, meta)| !meta.robots.is_indexable())
            .map(|(route, _)| route.path.clone())
            .collect();
        let path = config.robots_path();
        write_file(&path, &emit_robots(config, &disallowed))?;
        log!("robots"; "{}", display_relative(&path, root));
    }

    Ok(())
}
