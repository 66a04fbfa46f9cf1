//! Page rendering.
//!
//! Turns a route and its resolved metadata into a complete HTML document.
//! Rendering is pure: nothing here touches the filesystem.
//!
//! - `fill`: substitute markers in an HTML shell
//! - `patch`: clone a reference document and rewrite its head and body
//! - `dom`: owned document tree used by `patch`

pub mod dom;
mod fill;
mod head;
mod patch;

pub use dom::Document;
pub use fill::{PageVars, render_fill};
pub use patch::render_patch;

use crate::config::{BodyTarget, RenderStrategy};
use crate::debug;
use crate::embed::Template;
use crate::page::{PageMetadata, Route};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template `{template}`: marker `{{{{{marker}}}}}` must appear exactly once, found {count}")]
    TemplateContractViolation {
        template: String,
        marker: &'static str,
        count: usize,
    },

    #[error("reference document has no {0}")]
    MissingNode(String),

    #[error("cannot parse {what}: {reason}")]
    Parse { what: String, reason: String },
}

/// Rendering inputs for one route.
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'a> {
    Fill(&'a Template<PageVars>),
    Patch {
        reference: &'a Document,
        body_target: &'a BodyTarget,
    },
}

impl Strategy<'_> {
    pub const fn kind(&self) -> RenderStrategy {
        match self {
            Self::Fill(_) => RenderStrategy::Fill,
            Self::Patch { .. } => RenderStrategy::Patch,
        }
    }
}

/// Render one route to a full HTML document.
pub fn render(route: &Route, metadata: &PageMetadata, strategy: &Strategy<'_>) -> Result<String, RenderError> {
    debug!("render"; "{} via {}", route.path, strategy.kind());
    match strategy {
        Strategy::Fill(template) => render_fill(template, metadata),
        Strategy::Patch {
            reference,
            body_target,
        } => render_patch(reference, body_target, metadata),
    }
}
