//! `[[routes]]` static business pages.
//!
//! ```toml
//! [[routes]]
//! path = "/"
//! priority = 1.0
//! changefreq = "weekly"
//!
//! [[routes]]
//! path = "/cart"
//! noindex = true
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::{ChangeFrequency, RoutePath};
use crate::utils::date::DateTimeUtc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub path: String,
    /// Page title without the site name suffix.
    pub title: Option<String>,
    /// Short summary, used as description when the page has none.
    pub summary: Option<String>,
    pub priority: Option<f32>,
    pub changefreq: ChangeFrequency,
    /// Keep out of the sitemap and mark `noindex, nofollow`.
    pub noindex: bool,
    /// `YYYY-MM-DD` or RFC 3339.
    pub last_modified: Option<String>,
}

impl RouteConfig {
    pub fn validate(&self, index: usize, diag: &mut ConfigDiagnostics) {
        if let Err(e) = RoutePath::parse(&self.path) {
            diag.error(FieldPath::indexed("routes", index, "path"), e.to_string());
        }
        if let Some(priority) = self.priority
            && !(0.0..=1.0).contains(&priority)
        {
            diag.warn(
                FieldPath::indexed("routes", index, "priority"),
                format!("priority {priority} is outside 0.0..=1.0 and will be clamped"),
            );
        }
        if let Some(date) = &self.last_modified
            && DateTimeUtc::parse(date).is_none()
        {
            diag.error_with_hint(
                FieldPath::indexed("routes", index, "last_modified"),
                format!("invalid date `{date}`"),
                "use YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ",
            );
        }
    }
}
