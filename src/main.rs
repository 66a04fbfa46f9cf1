//! prerender - static pre-rendering of SPA routes for search engine crawlers.

mod cli;
mod config;
mod core;
mod embed;
mod generator;
mod logger;
mod output;
mod page;
mod pipeline;
mod render;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;
use core::CancelFlag;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => {
            let cancel = CancelFlag::new();
            cancel.install_ctrlc_handler()?;
            cli::build::build_site(&config, cancel).map(drop)
        }
        Commands::Routes { json } => cli::routes::list_routes(&config, *json),
        Commands::Sitemap { .. } => cli::sitemap::regenerate_sitemap(&config),
        Commands::Verify { warn_only } => cli::verify::verify_site(&config, *warn_only),
    }
}
