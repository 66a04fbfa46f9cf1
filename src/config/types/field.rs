//! Config field path used in diagnostics.

use owo_colors::OwoColorize;
use std::borrow::Cow;
use std::fmt;

/// Dotted path to a config field (`site.url`, `routes[2].path`).
///
/// Static paths are `const`; paths into arrays and tables are built at
/// validation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Cow<'static, str>);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(Cow::Borrowed(path))
    }

    /// Path into an array of tables: `routes[2].path`.
    pub fn indexed(array: &str, index: usize, field: &str) -> Self {
        Self(Cow::Owned(format!("{array}[{index}].{field}")))
    }

    /// Path into a keyed table: `pages."/about".title`.
    pub fn keyed(table: &str, key: &str, field: &str) -> Self {
        Self(Cow::Owned(format!("{table}.\"{key}\".{field}")))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_paths() {
        assert_eq!(FieldPath::new("site.url").as_str(), "site.url");
        assert_eq!(FieldPath::indexed("routes", 2, "path").as_str(), "routes[2].path");
        assert_eq!(
            FieldPath::keyed("pages", "/about", "robots").as_str(),
            "pages.\"/about\".robots"
        );
    }
}
