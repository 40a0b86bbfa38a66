//! Wall-clock <-> instant codec backed by the bundled tz database.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";
const TIME_FORMAT_WITH_SECONDS: &str = "%H:%M:%S";
const DISPLAY_FORMAT: &str = "%b %d, %Y %I:%M %p";
const LOG_DISPLAY_FORMAT: &str = "%b %d, %Y at %I:%M %p";
/// Longest known civil-time gap is a skipped calendar day.
const MAX_GAP_MINUTES: i64 = 24 * 60;

pub type TimeResult<T> = Result<T, TimeError>;

/// Malformed temporal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// Zone id is not in the tz database.
    InvalidZone(String),
    /// Date or time text does not parse, or names no reachable local time.
    InvalidTime(String),
}

impl Display for TimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidZone(value) => write!(f, "unknown time zone: `{value}`"),
            Self::InvalidTime(details) => write!(f, "invalid date/time: {details}"),
        }
    }
}

impl Error for TimeError {}

/// Validated IANA zone identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZoneId(Tz);

impl ZoneId {
    pub fn parse(value: &str) -> TimeResult<Self> {
        Tz::from_str(value)
            .map(Self)
            .map_err(|_| TimeError::InvalidZone(value.to_string()))
    }

    /// Canonical IANA name, e.g. `Asia/Kolkata`.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn tz(&self) -> Tz {
        self.0
    }
}

impl Display for ZoneId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ZoneId {
    type Err = TimeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for ZoneId {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ZoneId> for String {
    fn from(value: ZoneId) -> Self {
        value.name().to_string()
    }
}

/// Wall-clock date and time with no zone attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDateTime {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl LocalDateTime {
    fn naive(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// Parses `YYYY-MM-DD` plus `HH:MM` (or `HH:MM:SS`).
pub fn parse_local(date: &str, time: &str) -> TimeResult<LocalDateTime> {
    let parsed_date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|err| TimeError::InvalidTime(format!("date `{date}`: {err}")))?;
    let parsed_time = NaiveTime::parse_from_str(time, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(time, TIME_FORMAT_WITH_SECONDS))
        .map_err(|err| TimeError::InvalidTime(format!("time `{time}`: {err}")))?;
    Ok(LocalDateTime {
        date: parsed_date,
        time: parsed_time,
    })
}

/// Interprets `date` + `time` as wall-clock time in `zone`.
///
/// # Errors
/// - `InvalidZone` for ids outside the tz database.
/// - `InvalidTime` for malformed date/time text.
pub fn to_instant(date: &str, time: &str, zone: &str) -> TimeResult<DateTime<Utc>> {
    to_instant_in(date, time, ZoneId::parse(zone)?)
}

/// Same as [`to_instant`] for a zone that was already validated.
pub fn to_instant_in(date: &str, time: &str, zone: ZoneId) -> TimeResult<DateTime<Utc>> {
    let local = parse_local(date, time)?;
    resolve_local(&local, zone)
}

/// Resolves an already-parsed wall-clock value in `zone`.
pub fn resolve_local(local: &LocalDateTime, zone: ZoneId) -> TimeResult<DateTime<Utc>> {
    let naive = local.naive();
    match zone.tz().from_local_datetime(&naive) {
        LocalResult::Single(resolved) => Ok(resolved.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, _) => Ok(first.with_timezone(&Utc)),
        LocalResult::None => resolve_gap(naive, zone),
    }
}

// Reads the gap time with the offset that applied just before the jump,
// so the result lands after the transition by the same distance.
fn resolve_gap(naive: NaiveDateTime, zone: ZoneId) -> TimeResult<DateTime<Utc>> {
    let offset_seconds = (1..=MAX_GAP_MINUTES)
        .find_map(|minutes| {
            zone.tz()
                .from_local_datetime(&(naive - Duration::minutes(minutes)))
                .latest()
        })
        .map(|before| before.offset().fix().local_minus_utc())
        .ok_or_else(|| {
            TimeError::InvalidTime(format!("`{naive}` does not exist in {}", zone.name()))
        })?;

    Ok(Utc.from_utc_datetime(&(naive - Duration::seconds(i64::from(offset_seconds)))))
}

/// Renders `instant` in `zone` as `Mar 10, 2024 09:00 AM`.
pub fn to_local(instant: DateTime<Utc>, zone: ZoneId) -> String {
    instant
        .with_timezone(&zone.tz())
        .format(DISPLAY_FORMAT)
        .to_string()
}

/// Splits `instant` into the `(YYYY-MM-DD, HH:MM)` wall-clock pair in `zone`.
pub fn to_local_parts(instant: DateTime<Utc>, zone: ZoneId) -> (String, String) {
    let local = instant.with_timezone(&zone.tz());
    (
        local.format(DATE_FORMAT).to_string(),
        local.format(TIME_FORMAT).to_string(),
    )
}

/// Renders an audit timestamp as `Mar 10, 2024 at 09:00 AM`.
pub fn format_log_timestamp(timestamp: DateTime<Utc>, zone: ZoneId) -> String {
    timestamp
        .with_timezone(&zone.tz())
        .format(LOG_DISPLAY_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{parse_local, TimeError, ZoneId};

    #[test]
    fn parse_local_accepts_optional_seconds() {
        let short = parse_local("2024-03-10", "09:00").unwrap();
        let long = parse_local("2024-03-10", "09:00:00").unwrap();
        assert_eq!(short, long);
    }

    #[test]
    fn parse_local_rejects_malformed_input() {
        assert!(matches!(
            parse_local("2024-13-10", "09:00"),
            Err(TimeError::InvalidTime(_))
        ));
        assert!(matches!(
            parse_local("2024-03-10", "9am"),
            Err(TimeError::InvalidTime(_))
        ));
        assert!(matches!(
            parse_local("", "09:00"),
            Err(TimeError::InvalidTime(_))
        ));
    }

    #[test]
    fn zone_id_serializes_as_plain_name() {
        let zone = ZoneId::parse("Europe/Berlin").unwrap();
        assert_eq!(serde_json::to_string(&zone).unwrap(), "\"Europe/Berlin\"");

        let parsed: ZoneId = serde_json::from_str("\"Europe/Berlin\"").unwrap();
        assert_eq!(parsed, zone);
        assert!(serde_json::from_str::<ZoneId>("\"Mars/Olympus\"").is_err());
    }
}
