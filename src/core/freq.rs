//! Sitemap change frequency.

use serde::{Deserialize, Serialize};

/// How often a page is expected to change (`<changefreq>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    #[default]
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl std::fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        freq: ChangeFrequency,
    }

    #[test]
    fn test_deserialize_lowercase() {
        let w: Wrapper = toml::from_str(r#"freq = "monthly""#).unwrap();
        assert_eq!(w.freq, ChangeFrequency::Monthly);
    }

    #[test]
    fn test_deserialize_rejects_unknown() {
        assert!(toml::from_str::<Wrapper>(r#"freq = "fortnightly""#).is_err());
    }

    #[test]
    fn test_display_matches_sitemap_protocol() {
        assert_eq!(ChangeFrequency::Daily.to_string(), "daily");
        assert_eq!(ChangeFrequency::default().as_str(), "weekly");
    }
}
