//! Configuration section definitions.
//!
//! Each module corresponds to a section in `prerender.toml`:
//!
//! | Module    | TOML Section        | Purpose                                |
//! |-----------|---------------------|----------------------------------------|
//! | `build`   | `[build]`           | Output, strategy, sitemap, robots      |
//! | `content` | `[content]`         | Blog manifest and post route defaults  |
//! | `pages`   | `[pages."<path>"]`  | Explicit per-route metadata            |
//! | `routes`  | `[[routes]]`        | Static business pages                  |
//! | `site`    | `[site]`            | Site name, URL, language, defaults     |

pub mod build;
mod content;
mod pages;
mod routes;
pub mod site;

pub use build::{BodyTarget, BuildSectionConfig, RenderStrategy};
pub use content::ContentSectionConfig;
pub use pages::PageConfig;
pub use routes::RouteConfig;
pub use site::SiteSectionConfig;
