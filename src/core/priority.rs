//! Sitemap priority.

use serde::Serialize;

/// Relative importance of a URL within the site (`<priority>`).
///
/// Always within `0.0..=1.0`; construction clamps out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Priority(f32);

impl Priority {
    pub const DEFAULT: Self = Self(0.5);

    /// Clamp into range. Returns the priority and whether clamping happened.
    pub fn clamped(value: f32) -> (Self, bool) {
        if value.is_nan() {
            return (Self::DEFAULT, true);
        }
        let clamped = value.clamp(0.0, 1.0);
        (Self(clamped), (clamped - value).abs() > f32::EPSILON)
    }

    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Formats with one decimal, as the sitemap protocol examples do (`0.8`).
impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
