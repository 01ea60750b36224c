//! Timestamp normalization
//!
//! Listings timestamps look like `YYYYMMDDHHMMSS +HHMM`. The date part may be
//! truncated at any even boundary (`2026`, `202601`, `20260101`, ...); missing
//! components default to the start of the period. A missing UTC offset is
//! interpreted as UTC. Normalized timestamps compare across offsets.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// A normalized, comparable point in time.
pub type Timestamp = DateTime<Utc>;

#[derive(Debug, Error)]
pub enum ClockError {
    #[error("cannot parse '{0}' as a timestamp")]
    Unparseable(String),
}

/// Normalize a raw listings timestamp string.
pub fn normalize(raw: &str) -> Result<Timestamp, ClockError> {
    let trimmed = raw.trim();
    let (digits, offset) = match trimmed.split_once(char::is_whitespace) {
        Some((digits, offset)) => (digits, Some(offset.trim())),
        None => (trimmed, None),
    };

    let padded = pad_digits(digits).ok_or_else(|| ClockError::Unparseable(raw.to_string()))?;
    let naive = NaiveDateTime::parse_from_str(&padded, "%Y%m%d%H%M%S")
        .map_err(|_| ClockError::Unparseable(raw.to_string()))?;

    match offset {
        None => Ok(Utc.from_utc_datetime(&naive)),
        Some(offset) => {
            let offset =
                parse_offset(offset).ok_or_else(|| ClockError::Unparseable(raw.to_string()))?;
            offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| ClockError::Unparseable(raw.to_string()))
        }
    }
}

/// Pad a truncated date to the full 14-digit form. Missing month and day
/// default to 01, missing time components to zero.
fn pad_digits(digits: &str) -> Option<String> {
    if digits.is_empty()
        || digits.len() < 4
        || digits.len() > 14
        || digits.len() % 2 != 0
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let mut padded = digits.to_string();
    if padded.len() < 6 {
        padded.push_str("01");
    }
    if padded.len() < 8 {
        padded.push_str("01");
    }
    while padded.len() < 14 {
        padded.push('0');
    }
    Some(padded)
}

fn parse_offset(offset: &str) -> Option<FixedOffset> {
    let (sign, rest) = match offset.split_at_checked(1)? {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    if rest.len() != 4 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = rest[..2].parse().ok()?;
    let minutes: i32 = rest[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
