//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `build` - Built-in page shell (base.html)
//!
//! # Usage
//!
//! ```ignore
//! use embed::build::BASE_HTML;
//!
//! let html = BASE_HTML.render(&PageVars::new(&metadata, BASE_HTML.content()));
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod build {
    use super::Template;
    use crate::render::PageVars;

    /// Shell used by `fill` when neither the page nor `[build]` names a template.
    pub const BASE_HTML: Template<PageVars> = Template::new("built-in base.html", include_str!("html/base.html"));
}

#[cfg(test)]
mod tests {
    use super::build::BASE_HTML;

    #[test]
    fn test_base_html_markers() {
        for marker in ["{{title}}", "{{description}}", "{{canonical}}", "{{body}}"] {
            assert_eq!(BASE_HTML.content().matches(marker).count(), 1, "{marker}");
        }
        assert!(BASE_HTML.content().starts_with("<!DOCTYPE html>"));
    }
}
