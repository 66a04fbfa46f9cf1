//! Command-line interface definitions.

use crate::config::RenderStrategy;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Static pre-renderer for SEO crawlers
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output directory path (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Config file path (default: prerender.toml, searched upward)
    #[arg(short = 'C', long, global = true, default_value = "prerender.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Override the site URL from the config file.
    ///
    /// Useful when the same project is built for staging and production:
    ///   prerender build --site-url "https://staging.example.com"
    #[arg(short = 'U', long = "site-url", global = true, value_hint = clap::ValueHint::Url)]
    pub site_url: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render every route, then write sitemap.xml and robots.txt
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Print the resolved route catalog without rendering
    #[command(visible_alias = "r")]
    Routes {
        /// Print as JSON instead of a table
        #[arg(short, long)]
        json: bool,
    },

    /// Regenerate sitemap.xml and robots.txt from pages already on disk
    #[command(visible_alias = "s")]
    Sitemap {
        /// Minify the sitemap XML
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        minify: Option<bool>,
    },

    /// Check the output directory (descriptions, sitemap vs. pages on disk)
    #[command(visible_alias = "v")]
    Verify {
        /// Report problems as warnings and exit 0
        #[arg(short = 'w', long)]
        warn_only: bool,
    },
}

/// Build command arguments
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(short, long)]
    pub clean: bool,

    /// Render every route but write nothing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Render strategy, overriding `build.strategy`
    #[arg(short, long, value_enum)]
    pub strategy: Option<RenderStrategy>,

    /// Minify the sitemap XML
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,
}
