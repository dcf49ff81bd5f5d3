//! Timezone resolution for displaying bookmark dates
//!
//! Accepts `UTC`, IANA names such as `America/New_York` and fixed offsets
//! written as `-05:00`, `+0530` or `+09`.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The timezone used when none is configured or the configured one is invalid
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Timezone name that could not be resolved
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid timezone '{0}'")]
pub struct InvalidTimezone(pub String);

/// A resolved display timezone
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zone {
    Utc,
    Named(Tz),
    Fixed(FixedOffset),
}

impl Zone {
    /// Convert a UTC instant to this zone and format it
    pub fn format(&self, instant: &DateTime<Utc>, fmt: &str) -> String {
        match self {
            Zone::Utc => instant.format(fmt).to_string(),
            Zone::Named(tz) => instant.with_timezone(tz).format(fmt).to_string(),
            Zone::Fixed(offset) => instant.with_timezone(offset).format(fmt).to_string(),
        }
    }
}

impl FromStr for Zone {
    type Err = InvalidTimezone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("utc") || name == "Z" {
            return Ok(Zone::Utc);
        }
        if let Some(offset) = parse_offset(name) {
            return Ok(Zone::Fixed(offset));
        }
        name.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| InvalidTimezone(s.to_string()))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Utc => write!(f, "UTC"),
            Zone::Named(tz) => write!(f, "{}", tz.name()),
            Zone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// Parse `±HH:MM`, `±HHMM` or `±HH`
fn parse_offset(s: &str) -> Option<FixedOffset> {
    if !s.is_ascii() {
        return None;
    }
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some(parts) => parts,
        None if rest.len() == 4 => rest.split_at(2),
        None if rest.len() == 2 => (rest, "00"),
        None => return None,
    };
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.chars().chain(minutes.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
