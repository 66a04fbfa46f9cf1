//! `prerender build`: render every route, then the side files.

use crate::config::SiteConfig;
use crate::core::CancelFlag;
use crate::log;
use crate::pipeline::{BuildContext, BuildStats, run_build};
use crate::utils::plural_count;
use anyhow::{Result, bail};

pub fn build_site(config: &SiteConfig, cancel: CancelFlag) -> Result<BuildStats> {
    let ctx = BuildContext::new(config, cancel)?;
    let stats = run_build(&ctx)?;

    if let Some(reason) = stats.exit_error() {
        bail!(reason);
    }
    if stats.render_failed > 0 {
        log!(
            "warning";
            "{} skipped, {} of {} rendered",
            plural_count(stats.render_failed, "failed route"),
            stats.rendered,
            stats.discovered
        );
    }
    Ok(stats)
}
