//! Cancellation of a running generation (Ctrl+C).
//!
//! The flag lives in the build context rather than in a global, so a test can
//! drive cancellation without touching process signal handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancel flag, cheap to clone into workers and the signal handler.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Routes not yet started are reported as pending.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Uses Relaxed ordering - worst case a few more routes finish first.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Install the process Ctrl+C handler that sets this flag.
    ///
    /// A second Ctrl+C exits immediately.
    pub fn install_ctrlc_handler(&self) -> anyhow::Result<()> {
        let flag = self.clone();
        ctrlc::set_handler(move || {
            if flag.is_cancelled() {
                std::process::exit(130);
            }
            crate::log!("build"; "cancelling, waiting for running routes...");
            flag.cancel();
        })
        .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
    }
}
