//! Logging utilities with colored output and progress display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, only printed with `--verbose`
//! - `ProgressLine` for single-line progress display with multiple counters
//!
//! # Example
//!
//! ```ignore
//! log!("catalog"; "{} routes discovered", count);
//!
//! let progress = ProgressLine::new(&[("pages", 21)]);
//! progress.inc("pages");
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Active progress bar count (for log coordination)
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();

    // Clear an in-place progress line before printing over it
    let bar_count = BAR_COUNT.load(Ordering::SeqCst);
    if bar_count > 0 {
        execute!(stdout, cursor::MoveToColumn(0)).ok();
        execute!(stdout, Clear(ClearType::CurrentLine)).ok();
    }

    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "error" | "failed" => prefix.bright_red().bold().to_string(),
        "warning" | "warn" | "skip" => prefix.bright_magenta().bold().to_string(),
        "done" | "verify" => prefix.bright_green().bold().to_string(),
        "sitemap" | "robots" => prefix.bright_blue().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Progress Line (single-line counters)
// ============================================================================

/// Single-line progress display with multiple counters
///
/// Displays: `[build] pages(12/21) failed(1/21)`
///
/// Counters update in place on the same line. Uses `try_lock` so worker
/// threads never block on the display; a busy display just skips a refresh.
pub struct ProgressLine {
    counters: Vec<Counter>,
    lock: Mutex<()>,
}

struct Counter {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
}

impl ProgressLine {
    /// Create a new progress display.
    ///
    /// Only includes counters with total > 0.
    pub fn new(items: &[(&'static str, usize)]) -> Self {
        let counters: Vec<_> = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|(name, total)| Counter {
                name,
                total: *total,
                current: AtomicUsize::new(0),
            })
            .collect();

        BAR_COUNT.store(1, Ordering::SeqCst);

        let progress = Self {
            counters,
            lock: Mutex::new(()),
        };
        progress.display();
        progress
    }

    /// Increment the counter with the given name.
    #[inline]
    pub fn inc(&self, name: &str) {
        for counter in &self.counters {
            if counter.name == name {
                counter.current.fetch_add(1, Ordering::Relaxed);
                if self.lock.try_lock().is_some() {
                    self.display();
                }
                return;
            }
        }
    }

    fn render_line(&self) -> String {
        self.counters
            .iter()
            .map(|c| format!("{}({}/{})", c.name, c.current.load(Ordering::Relaxed), c.total))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Display the current progress line (overwrites current line).
    fn display(&self) {
        let line = self.render_line();
        let prefix = colorize_prefix("build", "build");

        let mut stdout = stdout().lock();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        write!(stdout, "{} {}", prefix, line).ok();
        stdout.flush().ok();
    }

    /// Finish progress display, preserve line and move to next line.
    pub fn finish(self) {
        BAR_COUNT.store(0, Ordering::SeqCst);

        {
            let _guard = self.lock.lock(); // Wait for any pending display

            let line = self.render_line();
            let prefix = colorize_prefix("build", "build");

            let mut stdout = stdout().lock();
            execute!(
                stdout,
                cursor::MoveToColumn(0),
                Clear(ClearType::CurrentLine)
            )
            .ok();
            writeln!(stdout, "{} {}", prefix, line).ok();
            stdout.flush().ok();
        }

        std::mem::forget(self); // Prevent Drop from clearing
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        BAR_COUNT.store(0, Ordering::SeqCst);

        let mut stdout = stdout().lock();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        stdout.flush().ok();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_prefix_keeps_module_name() {
        assert!(colorize_prefix("sitemap", "sitemap").contains("[sitemap]"));
        assert!(colorize_prefix("Warning", "warning").contains("[Warning]"));
    }

    #[test]
    fn test_progress_line_skips_empty_counters() {
        let progress = ProgressLine::new(&[("pages", 3), ("failed", 0)]);
        assert_eq!(progress.counters.len(), 1);
        progress.inc("pages");
        progress.inc("unknown");
        assert_eq!(progress.render_line(), "pages(1/3)");
        drop(progress);
    }

    #[test]
    fn test_verbose_flag() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
