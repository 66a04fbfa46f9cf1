//! Per-route outcomes and the run summary.

use crate::output::WriteError;
use crate::render::RenderError;
use crate::utils::plural_count;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// What happened to one route.
#[derive(Debug)]
pub enum RouteOutcome {
    Written(PathBuf),
    /// Rendered but not written (`--dry-run`).
    Rendered,
    Failed(RouteError),
    /// Not started before cancellation.
    Pending,
}

impl RouteOutcome {
    /// Whether the page exists in its new form (or would, for a dry run).
    pub const fn is_rendered(&self) -> bool {
        matches!(self, Self::Written(_) | Self::Rendered)
    }
}

/// Counters folded from the route outcomes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildStats {
    pub discovered: usize,
    pub rendered: usize,
    pub written: usize,
    /// Content records dropped while building the catalog.
    pub skipped: usize,
    /// Routes whose render failed (contract violation, missing node).
    pub render_failed: usize,
    /// Routes rendered but not written.
    pub write_failed: usize,
    pub pending: usize,
    /// Stale pages removed from the output directory.
    pub pruned: usize,
}

impl BuildStats {
    pub fn record(&mut self, outcome: &RouteOutcome) {
        match outcome {
            RouteOutcome::Written(_) => {
                self.rendered += 1;
                self.written += 1;
            }
            RouteOutcome::Rendered => self.rendered += 1,
            RouteOutcome::Failed(RouteError::Render(_)) => self.render_failed += 1,
            RouteOutcome::Failed(RouteError::Write(_)) => self.write_failed += 1,
            RouteOutcome::Pending => self.pending += 1,
        }
    }

    pub const fn failed(&self) -> usize {
        self.render_failed + self.write_failed
    }

    pub const fn is_cancelled(&self) -> bool {
        self.pending > 0
    }

    /// Every route rendered (and written, unless dry run).
    pub const fn is_success(&self) -> bool {
        self.discovered > 0 && self.failed() == 0 && self.pending == 0
    }

    /// Why the run should end with a non-zero exit, if it should.
    ///
    /// Render failures alone are tolerated while at least one route made it;
    /// write failures and cancellation never are.
    pub fn exit_error(&self) -> Option<String> {
        if self.is_cancelled() {
            Some(format!(
                "build cancelled with {} pending",
                plural_count(self.pending, "route")
            ))
        } else if self.write_failed > 0 {
            Some(format!(
                "{} could not be written",
                plural_count(self.write_failed, "route")
            ))
        } else if self.rendered == 0 {
            Some(format!("no route rendered ({} failed)", self.render_failed))
        } else {
            None
        }
    }

    /// `7 routes discovered, 7 rendered, 7 written, 1 skipped, 0 failed`
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} discovered, {} rendered, {} written, {} skipped, {} failed",
            plural_count(self.discovered, "route"),
            self.rendered,
            self.written,
            self.skipped,
            self.failed(),
        );
        if self.pending > 0 {
            line.push_str(&format!(", {} pending", self.pending));
        }
        if self.pruned > 0 {
            line.push_str(&format!(", {} pruned", self.pruned));
        }
        line
    }
}
