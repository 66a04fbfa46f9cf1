//! `robots.txt` generation configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    /// Enable robots.txt generation.
    pub enable: bool,
    /// Output path, relative to the output directory.
    pub path: PathBuf,
    /// Extra `Disallow` rules beyond the noindex routes (e.g. `/api/`).
    pub disallow: Vec<String>,
    /// `Crawl-delay` in seconds for the wildcard agent.
    pub crawl_delay: Option<u32>,
    /// User agents denied the whole site.
    pub blocked_agents: Vec<String>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "robots.txt".into(),
            disallow: Vec::new(),
            crawl_delay: None,
            blocked_agents: Vec::new(),
        }
    }
}
