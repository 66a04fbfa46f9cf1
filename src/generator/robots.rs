//! `robots.txt` generation.
//!
//! ```text
//! User-agent: *
//! Allow: /
//! Disallow: /thank-you$
//! Crawl-delay: 1
//!
//! User-agent: AhrefsBot
//! Disallow: /
//!
//! Sitemap: https://example.com/sitemap.xml
//! ```

use crate::config::SiteConfig;
use crate::core::RoutePath;
use std::fmt::Write;

/// Render `robots.txt`.
///
/// `disallowed` are the routes rendered with a noindex directive. Each is
/// anchored with `$` so it never blocks a child or sibling route sharing the
/// prefix. Configured rules follow verbatim. Duplicates are written once.
pub fn emit_robots(config: &SiteConfig, disallowed: &[RoutePath]) -> String {
    let robots = &config.build.robots;
    let mut out = String::from("User-agent: *\nAllow: /\n");

    let mut seen = Vec::with_capacity(disallowed.len() + robots.disallow.len());
    let rules = disallowed
        .iter()
        .map(|path| format!("{}$", path.to_encoded()))
        .chain(robots.disallow.iter().map(|rule| rule.trim().to_string()));
    for rule in rules {
        if rule != "/" && !seen.contains(&rule) {
            let _ = writeln!(out, "Disallow: {rule}");
            seen.push(rule);
        }
    }

    if let Some(delay) = robots.crawl_delay {
        let _ = writeln!(out, "Crawl-delay: {delay}");
    }

    for agent in &robots.blocked_agents {
        let _ = write!(out, "\nUser-agent: {agent}\nDisallow: /\n");
    }

    if config.build.sitemap.enable {
        let sitemap = config.build.sitemap.path.to_string_lossy().replace('\\', "/");
        let _ = write!(out, "\nSitemap: {}/{}\n", config.site.base_url(), sitemap);
    }

    out
}
