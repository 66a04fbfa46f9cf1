//! Content manifest records (blog posts).
//!
//! A manifest is JSON (top-level array, or object with a `posts` array) or
//! TOML (`[[posts]]` tables), picked by file extension. Records are decoded
//! one by one so a single bad record never hides the rest.
//!
//! ```json
//! [
//!   { "id": "local-seo-guide", "title": "Local SEO Guide",
//!     "excerpt": "How to rank in your city.", "lastModified": "2025-01-15" }
//! ]
//! ```

use crate::core::ChangeFrequency;
use crate::utils::date::DateTimeUtc;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Post ids double as URL segments.
static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("valid slug regex"));

/// A validated manifest record.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentEntry {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub last_modified: Option<DateTimeUtc>,
    pub priority: Option<f32>,
    pub changefreq: Option<ChangeFrequency>,
}

/// Record as written in the manifest, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    id: String,
    title: String,
    #[serde(default, alias = "excerpt", alias = "description")]
    summary: Option<String>,
    #[serde(default, alias = "last_modified", alias = "updatedAt")]
    last_modified: Option<String>,
    #[serde(default, alias = "publishedAt")]
    date: Option<String>,
    #[serde(default)]
    priority: Option<f32>,
    #[serde(default)]
    changefreq: Option<ChangeFrequency>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Toml,
}

impl ManifestFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// The manifest as a whole could not be used.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("unsupported manifest format `{0}` (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("expected {0}")]
    Shape(&'static str),
}

/// Problem with a single record. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIssue {
    /// Record skipped.
    Malformed {
        index: usize,
        id: Option<String>,
        reason: String,
    },
    /// Record kept, date dropped.
    InvalidDate { id: String, value: String },
}

/// Decoded manifest: usable entries in source order plus per-record issues.
#[derive(Debug, Default)]
pub struct Manifest {
    pub entries: Vec<ContentEntry>,
    pub issues: Vec<RecordIssue>,
}

/// Read and decode a manifest file.
pub fn load_manifest(path: &Path) -> Result<Manifest, SourceError> {
    let format = ManifestFormat::from_path(path)
        .ok_or_else(|| SourceError::UnsupportedFormat(path.to_path_buf()))?;
    let text = fs::read_to_string(path).map_err(|e| SourceError::Io(path.to_path_buf(), e))?;
    parse_manifest(&text, format)
}

/// Decode manifest text.
pub fn parse_manifest(text: &str, format: ManifestFormat) -> Result<Manifest, SourceError> {
    let decoded: Vec<(Option<String>, Result<RawRecord, String>)> = match format {
        ManifestFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(text)?;
            let items = match value {
                serde_json::Value::Array(items) => items,
                serde_json::Value::Object(mut map) => match map.remove("posts") {
                    Some(serde_json::Value::Array(items)) => items,
                    _ => return Err(SourceError::Shape("an array or an object with a `posts` array")),
                },
                _ => return Err(SourceError::Shape("an array or an object with a `posts` array")),
            };
            items
                .into_iter()
                .map(|item| {
                    let id = item.get("id").and_then(|v| v.as_str()).map(str::to_string);
                    let record = serde_json::from_value::<RawRecord>(item).map_err(|e| e.to_string());
                    (id, record)
                })
                .collect()
        }
        ManifestFormat::Toml => {
            let mut table: toml::Table = toml::from_str(text)?;
            let items = match table.remove("posts") {
                Some(toml::Value::Array(items)) => items,
                None => Vec::new(),
                Some(_) => return Err(SourceError::Shape("`posts` to be an array of tables")),
            };
            items
                .into_iter()
                .map(|item| {
                    let id = item.get("id").and_then(|v| v.as_str()).map(str::to_string);
                    let record = RawRecord::deserialize(item).map_err(|e| e.to_string());
                    (id, record)
                })
                .collect()
        }
    };

    let mut manifest = Manifest::default();
    for (index, (id, record)) in decoded.into_iter().enumerate() {
        match record.and_then(validate_record) {
            Ok((entry, date_issue)) => {
                manifest.issues.extend(date_issue);
                manifest.entries.push(entry);
            }
            Err(reason) => manifest.issues.push(RecordIssue::Malformed { index, id, reason }),
        }
    }
    Ok(manifest)
}

fn validate_record(raw: RawRecord) -> Result<(ContentEntry, Option<RecordIssue>), String> {
    let id = raw.id.trim().to_string();
    let title = raw.title.trim().to_string();
    if id.is_empty() {
        return Err("empty `id`".into());
    }
    if !SLUG.is_match(&id) {
        return Err(format!("`id` must match {}", SLUG.as_str()));
    }
    if title.is_empty() {
        return Err("empty `title`".into());
    }

    let mut issue = None;
    let last_modified = match raw.last_modified.or(raw.date) {
        Some(value) => {
            let parsed = parse_record_date(&value);
            if parsed.is_none() {
                issue = Some(RecordIssue::InvalidDate {
                    id: id.clone(),
                    value,
                });
            }
            parsed
        }
        None => None,
    };

    let summary = raw
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok((
        ContentEntry {
            id,
            title,
            summary,
            last_modified,
            priority: raw.priority,
            changefreq: raw.changefreq,
        },
        issue,
    ))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SSZ`, and any longer ISO
/// timestamp by keeping its date part (`2025-01-15T10:00:00.000+02:00`).
fn parse_record_date(value: &str) -> Option<DateTimeUtc> {
    let value = value.trim();
    DateTimeUtc::parse(value).or_else(|| {
        let (date, rest) = value.split_at_checked(10)?;
        rest.starts_with('T').then(|| DateTimeUtc::parse(date)).flatten()
    })
}
