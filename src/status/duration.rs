//! Status duration strings.
//!
//! Game data writes durations as an integer followed by a one-letter unit:
//! `30s`, `5m`, `2h`, `1d`, `1w`, `1M`, `1y`. An empty string means the
//! status is permanent.

use std::time::Duration;

use thiserror::Error;

const SECOND: u64 = 1;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Malformed duration string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("invalid duration \"{0}\": unknown unit (expected one of y M w d h m s)")]
    UnknownUnit(String),
    #[error("invalid duration \"{0}\": expected a whole number before the unit")]
    InvalidAmount(String),
}

/// Parse a duration string. Empty input yields `None` (permanent).
///
/// ```
/// use std::time::Duration;
/// use rust_ifgame::status::parse_duration;
///
/// assert_eq!(parse_duration("90s").unwrap(), Some(Duration::from_secs(90)));
/// assert_eq!(parse_duration("").unwrap(), None);
/// assert!(parse_duration("5x").is_err());
/// ```
pub fn parse_duration(text: &str) -> Result<Option<Duration>, DurationParseError> {
    let text = text.trim();
    let Some(unit) = text.chars().last() else {
        return Ok(None);
    };

    // Months and years use fixed 30 and 365 day lengths.
    let unit_secs = match unit {
        'y' => 365 * DAY,
        'M' => 30 * DAY,
        'w' => 7 * DAY,
        'd' => DAY,
        'h' => HOUR,
        'm' => MINUTE,
        's' => SECOND,
        _ => return Err(DurationParseError::UnknownUnit(text.to_string())),
    };

    let amount: u64 = text[..text.len() - unit.len_utf8()]
        .trim()
        .parse()
        .map_err(|_| DurationParseError::InvalidAmount(text.to_string()))?;

    amount
        .checked_mul(unit_secs)
        .map(|secs| Some(Duration::from_secs(secs)))
        .ok_or_else(|| DurationParseError::InvalidAmount(text.to_string()))
}
