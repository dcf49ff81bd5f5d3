//! Bookmark record and its on-disk timestamp encoding

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A saved URL with its tags and creation instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Bookmarked URL (older files store it as `bookmarkURL`)
    #[serde(alias = "bookmarkURL")]
    pub url: String,

    /// Comma-separated tags, kept exactly as entered
    #[serde(default)]
    pub tags: String,

    /// Creation instant in UTC
    #[serde(with = "iso_date")]
    pub date: DateTime<Utc>,
}

impl Bookmark {
    /// Create a bookmark stamped with the current UTC time
    pub fn new(url: impl Into<String>, tags: impl Into<String>) -> Self {
        Self::at(url, tags, Utc::now())
    }

    pub fn at(url: impl Into<String>, tags: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            tags: tags.into(),
            date,
        }
    }

    /// Individual tags, trimmed, skipping empty entries
    pub fn tag_list(&self) -> impl Iterator<Item = &str> + '_ {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_list().any(|t| t == tag)
    }
}

/// Parse a stored timestamp
///
/// RFC 3339 with any offset is normalized to UTC. A naive timestamp without
/// offset (`2024-01-01T12:00:00.123456`) is taken to be UTC already.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(e) => raw
            .parse::<NaiveDateTime>()
            .map(|naive| naive.and_utc())
            .map_err(|_| e),
    }
}

/// Encode as RFC 3339 with an explicit `+00:00` offset
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

mod iso_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw)
            .map_err(|e| serde::de::Error::custom(format!("invalid date '{}': {}", raw, e)))
    }
}
