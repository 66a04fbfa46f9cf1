//! `prerender verify`: check the generated output directory.
//!
//! Reads back what is on disk, independent of the current catalog:
//!
//! - every page has a title, a description and a canonical link that matches
//!   its location (and `og:url`, when present)
//! - descriptions are unique, with length warnings outside 150-160
//! - the sitemap is well-formed and lists exactly the indexable pages
//! - robots.txt points at the sitemap

mod report;
mod sitemap;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use percent_encoding::percent_decode_str;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::SiteConfig;
use crate::core::{RobotsDirective, RoutePath};
use crate::generator::sitemap::SITEMAP_NS;
use crate::log;
use crate::output::collect_pages;
use crate::page::meta::RECOMMENDED_DESCRIPTION_LEN;
use crate::render::Document;
use crate::utils::path::display_relative;
use crate::utils::plural_count;

use report::VerifyReport;
use sitemap::read_sitemap;

const DESCRIPTIONS: &str = "descriptions";

pub fn verify_site(config: &SiteConfig, warn_only: bool) -> Result<()> {
    let report = verify_output(config)?;
    report.print();
    log!("verify"; "{} checked: {}", plural_count(report.pages, "page"), report);

    let problems = report.problem_count();
    if problems > 0 && !warn_only {
        bail!("verification failed with {}", plural_count(problems, "problem"));
    }
    Ok(())
}

/// SEO-relevant head values read from a page on disk.
#[derive(Debug, Default)]
struct ScannedPage {
    route: RoutePath,
    file: PathBuf,
    title: Option<String>,
    description: Option<String>,
    canonical: Option<String>,
    og_url: Option<String>,
    robots: RobotsDirective,
    error: Option<String>,
}

fn verify_output(config: &SiteConfig) -> Result<VerifyReport> {
    let output_dir = config.output_dir();
    if !output_dir.is_dir() {
        bail!(
            "output directory {} does not exist, run `prerender build` first",
            output_dir.display()
        );
    }

    let root = config.get_root();
    let base = config.site.base_url();
    let mut report = VerifyReport::default();

    let scanned: Vec<ScannedPage> = collect_pages(output_dir)
        .into_par_iter()
        .map(|(route, file)| scan_page(route, file))
        .collect();
    report.pages = scanned.len();

    for page in &scanned {
        check_page(page, base, &display_relative(&page.file, root), &mut report);
    }
    check_duplicate_descriptions(&scanned, &mut report);

    if config.build.sitemap.enable {
        check_sitemap(&config.sitemap_path(), base, &scanned, root, &mut report);
    }
    if config.build.robots.enable {
        check_robots(config, root, &mut report);
    }

    Ok(report)
}

fn scan_page(route: RoutePath, file: PathBuf) -> ScannedPage {
    let mut page = ScannedPage {
        route,
        ..Default::default()
    };

    let doc = match fs::read_to_string(&file)
        .map_err(|e| e.to_string())
        .and_then(|html| Document::parse(&html).map_err(|e| e.to_string()))
    {
        Ok(doc) => doc,
        Err(e) => {
            page.error = Some(e);
            page.file = file;
            return page;
        }
    };

    let meta_content = |attr: &str, key: &str| {
        doc.find(&|e| e.tag == "meta" && e.attr_is(attr, key))
            .and_then(|e| e.attr("content"))
            .map(|v| v.trim().to_string())
    };

    page.title = doc.element("title").map(|e| e.text().trim().to_string());
    page.description = meta_content("name", "description");
    page.og_url = meta_content("property", "og:url");
    page.robots = meta_content("name", "robots")
        .and_then(|content| RobotsDirective::from_content(&content))
        .unwrap_or_default();
    page.canonical = doc
        .find(&|e| e.tag == "link" && e.attr_has_token("rel", "canonical"))
        .and_then(|e| e.attr("href"))
        .map(|v| v.trim().to_string());
    page.file = file;
    page
}

fn check_page(page: &ScannedPage, base: &str, source: &str, report: &mut VerifyReport) {
    if let Some(error) = &page.error {
        report.add_problem(source, format!("unreadable: {error}"));
        return;
    }

    if page.title.as_deref().is_none_or(str::is_empty) {
        report.add_problem(source, "missing <title>");
    }

    match page.description.as_deref() {
        None | Some("") => report.add_problem(source, "missing meta description"),
        Some(description) => {
            let len = description.chars().count();
            if !RECOMMENDED_DESCRIPTION_LEN.contains(&len) {
                report.add_warning(
                    source,
                    format!(
                        "description is {len} characters (recommended {}-{})",
                        RECOMMENDED_DESCRIPTION_LEN.start(),
                        RECOMMENDED_DESCRIPTION_LEN.end()
                    ),
                );
            }
        }
    }

    let expected = page.route.canonical_url(base);
    match page.canonical.as_deref() {
        None => report.add_problem(source, "missing canonical link"),
        Some(canonical) if canonical != expected => report.add_problem(
            source,
            format!("canonical `{canonical}`, expected `{expected}`"),
        ),
        Some(_) => {}
    }

    match page.og_url.as_deref() {
        None => report.add_warning(source, "missing og:url"),
        Some(og_url) if og_url != expected => {
            report.add_problem(source, format!("og:url `{og_url}`, expected `{expected}`"))
        }
        Some(_) => {}
    }
}

fn check_duplicate_descriptions(pages: &[ScannedPage], report: &mut VerifyReport) {
    let mut by_description: BTreeMap<&str, Vec<&RoutePath>> = BTreeMap::new();
    for page in pages {
        if let Some(description) = page.description.as_deref().filter(|d| !d.is_empty()) {
            by_description.entry(description).or_default().push(&page.route);
        }
    }

    for (description, routes) in by_description {
        if routes.len() > 1 {
            let routes: Vec<&str> = routes.iter().map(|r| r.as_str()).collect();
            report.add_problem(
                DESCRIPTIONS,
                format!("\"{description}\" shared by {}", routes.join(", ")),
            );
        }
    }
}

fn check_sitemap(
    path: &Path,
    base: &str,
    pages: &[ScannedPage],
    root: &Path,
    report: &mut VerifyReport,
) {
    let source = display_relative(path, root);
    let Ok(xml) = fs::read_to_string(path) else {
        report.add_problem(source, "not found");
        return;
    };
    let doc = match read_sitemap(&xml) {
        Ok(doc) => doc,
        Err(e) => {
            report.add_problem(source, format!("invalid XML: {e}"));
            return;
        }
    };

    if !doc.has_declaration {
        report.add_problem(&source, "missing XML declaration");
    }
    if doc.namespace.as_deref() != Some(SITEMAP_NS) {
        report.add_problem(&source, format!("missing namespace `{SITEMAP_NS}`"));
    }

    let on_disk: FxHashMap<&RoutePath, &ScannedPage> = pages.iter().map(|p| (&p.route, p)).collect();
    let root_loc = format!("{base}/");
    let mut listed = FxHashSet::default();

    for loc in &doc.locs {
        let Some(rest) = loc.strip_prefix(base).filter(|rest| rest.starts_with('/')) else {
            report.add_problem(&source, format!("`{loc}` is not under {root_loc}"));
            continue;
        };
        if *loc != root_loc && loc.ends_with('/') {
            report.add_problem(&source, format!("`{loc}` has a trailing slash"));
        }

        let decoded = percent_decode_str(rest).decode_utf8_lossy();
        let Ok(route) = RoutePath::parse(&decoded) else {
            report.add_problem(&source, format!("`{loc}` is not a valid route"));
            continue;
        };
        if !listed.insert(route.clone()) {
            report.add_problem(&source, format!("`{loc}` listed more than once"));
            continue;
        }

        match on_disk.get(&route) {
            None => report.add_problem(&source, format!("`{loc}` has no page on disk")),
            Some(page) if !page.robots.is_indexable() => {
                report.add_problem(&source, format!("`{loc}` is marked {}", page.robots.content()))
            }
            Some(_) => {}
        }
    }

    for page in pages {
        if page.error.is_none() && page.robots.is_indexable() && !listed.contains(&page.route) {
            report.add_problem(&source, format!("`{}` missing from sitemap", page.route));
        }
    }
}

fn check_robots(config: &SiteConfig, root: &Path, report: &mut VerifyReport) {
    let path = config.robots_path();
    let source = display_relative(&path, root);
    let Ok(robots) = fs::read_to_string(&path) else {
        report.add_problem(source, "not found");
        return;
    };

    if config.build.sitemap.enable {
        let sitemap = config.build.sitemap.path.to_string_lossy().replace('\\', "/");
        let expected = format!("Sitemap: {}/{}", config.site.base_url(), sitemap);
        if !robots.lines().any(|line| line.trim() == expected) {
            report.add_problem(source, format!("missing `{expected}`"));
        }
    }
}
