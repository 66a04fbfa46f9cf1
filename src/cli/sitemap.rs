//! `prerender sitemap`: regenerate sitemap.xml and robots.txt without rendering.

use crate::config::SiteConfig;
use crate::log;
use crate::output::output_path;
use crate::pipeline::{Plan, write_side_files};
use crate::utils::date::DateTimeUtc;
use crate::utils::plural_count;
use anyhow::{Result, bail};

/// Only routes whose page already exists on disk are listed.
pub fn regenerate_sitemap(config: &SiteConfig) -> Result<()> {
    if !config.build.sitemap.enable && !config.build.robots.enable {
        log!("sitemap"; "sitemap and robots.txt are both disabled");
        return Ok(());
    }

    let plan = Plan::new(config);
    plan.report_warnings();

    let (present, missing): (Vec<_>, Vec<_>) = plan
        .iter()
        .partition(|(route, _)| output_path(config.output_dir(), &route.path).is_file());

    if present.is_empty() {
        bail!(
            "no rendered pages in {}, run `prerender build` first",
            config.output_dir().display()
        );
    }
    if !missing.is_empty() {
        log!("skip"; "{} not rendered yet", plural_count(missing.len(), "route"));
        for (route, _) in &missing {
            crate::debug!("skip"; "{}", route.path);
        }
    }

    write_side_files(config, &present, DateTimeUtc::now())?;
    Ok(())
}
