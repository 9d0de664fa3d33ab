//! Permissive timestamp parser.
//!
//! # Responsibility
//! - Accept the time formats the chat agent is prompted to emit: ISO-8601
//!   date-times and 12/24-hour clock forms.
//! - Resolve clock-only inputs against a caller-supplied reference instant.
//!
//! # Invariants
//! - Date-times without an explicit offset are interpreted as UTC.
//! - `today`/`tomorrow` are relative to the reference instant's UTC date.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(today|tomorrow)\s+(?:at\s+)?)?(\d{1,2}):(\d{2})(?:\s*(am|pm))?$")
        .expect("valid clock regex")
});

/// Failure to interpret a free-form time string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeParseError {
    pub input: String,
}

impl Display for TimeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized time `{}`", self.input)
    }
}

impl Error for TimeParseError {}

/// Parses a free-form time string into Unix epoch milliseconds.
///
/// Accepted forms, tried in order:
/// - RFC 3339 with offset: `2026-03-01T14:00:00Z`.
/// - `YYYY-MM-DDTHH:MM[:SS]` and `YYYY-MM-DD HH:MM[:SS]`, treated as UTC.
/// - `YYYY-MM-DD`, midnight UTC.
/// - Clock-only: `HH:MM`, `H:MM am/pm`, optionally prefixed with `today` or
///   `tomorrow`, resolved against `reference`'s UTC date.
///
/// # Errors
/// - `TimeParseError` when no form matches or a clock field is out of range.
pub fn parse_timestamp_ms(
    input: &str,
    reference: DateTime<Utc>,
) -> Result<i64, TimeParseError> {
    let trimmed = input.trim();
    let err = || TimeParseError {
        input: trimmed.to_string(),
    };

    if trimmed.is_empty() {
        return Err(err());
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc).timestamp_millis());
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive).timestamp_millis());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(err)?;
        return Ok(Utc.from_utc_datetime(&midnight).timestamp_millis());
    }

    if let Some(captures) = CLOCK_RE.captures(trimmed) {
        let day_word = captures
            .get(1)
            .map(|word| word.as_str().to_ascii_lowercase());
        let hour: u32 = captures[2].parse().map_err(|_| err())?;
        let minute: u32 = captures[3].parse().map_err(|_| err())?;
        let meridiem = captures
            .get(4)
            .map(|word| word.as_str().to_ascii_lowercase());

        let hour = match meridiem.as_deref() {
            Some("am") => match hour {
                12 => 0,
                1..=11 => hour,
                _ => return Err(err()),
            },
            Some("pm") => match hour {
                12 => 12,
                1..=11 => hour + 12,
                _ => return Err(err()),
            },
            _ => hour,
        };

        let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(err)?;
        let mut date = reference.date_naive();
        if day_word.as_deref() == Some("tomorrow") {
            date += Duration::days(1);
        }

        return Ok(Utc.from_utc_datetime(&date.and_time(time)).timestamp_millis());
    }

    Err(err())
}
