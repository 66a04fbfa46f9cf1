//! Pluralization for summary lines (`3 routes`, `1 warning`).

/// Return "s" suffix for plural counts
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
///
/// - `plural_count(0, "route")` -> `"0 routes"`
/// - `plural_count(1, "route")` -> `"1 route"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}
