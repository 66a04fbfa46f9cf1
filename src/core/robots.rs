//! Robots meta directive.

use serde::{Deserialize, Serialize};

/// Value of `<meta name="robots">` for a page.
///
/// Only `IndexFollow` pages are listed in the sitemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RobotsDirective {
    #[default]
    IndexFollow,
    NoindexFollow,
    NoindexNofollow,
}

impl RobotsDirective {
    /// Content attribute of the robots meta tag.
    pub const fn content(self) -> &'static str {
        match self {
            Self::IndexFollow => "index, follow",
            Self::NoindexFollow => "noindex, follow",
            Self::NoindexNofollow => "noindex, nofollow",
        }
    }

    #[inline]
    pub const fn is_indexable(self) -> bool {
        matches!(self, Self::IndexFollow)
    }

    /// Parse a robots meta content value read back from a document.
    pub fn from_content(content: &str) -> Option<Self> {
        let tokens: Vec<String> = content
            .split(',')
            .map(|t| t.trim().to_ascii_lowercase())
            .collect();
        let has = |t: &str| tokens.iter().any(|x| x == t);

        if has("none") || (has("noindex") && has("nofollow")) {
            Some(Self::NoindexNofollow)
        } else if has("noindex") {
            Some(Self::NoindexFollow)
        } else if has("index") || has("all") || has("follow") {
            Some(Self::IndexFollow)
        } else {
            None
        }
    }
}
