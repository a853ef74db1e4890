//! Local calendar selection.
//!
//! The dashboard shows dates in the user's local calendar while the API
//! works in UTC. [`LocalZone`] pins down what "local" means for a
//! [`Normalizer`](crate::Normalizer): the host zone, or a fixed offset.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeDelta, TimeZone, Utc,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::NormalizeError;
use crate::value::DateValue;

/// Zone whose calendar fields count as "local".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalZone {
    /// The host's configured zone.
    #[default]
    System,
    /// A fixed UTC offset.
    Fixed(FixedOffset),
}

impl LocalZone {
    /// UTC as the local zone.
    #[must_use]
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// A fixed offset east of UTC, in seconds.
    pub fn east(seconds: i32) -> Result<Self, NormalizeError> {
        FixedOffset::east_opt(seconds)
            .map(Self::Fixed)
            .ok_or_else(|| NormalizeError::InvalidZone(format!("{seconds}s")))
    }

    /// Local calendar date of an instant.
    #[must_use]
    pub fn local_date(&self, value: &DateValue) -> NaiveDate {
        match self {
            Self::System => value.as_utc().with_timezone(&Local).date_naive(),
            Self::Fixed(offset) => value.as_utc().with_timezone(offset).date_naive(),
        }
    }

    /// Local year, month (1-12) and day of an instant.
    #[must_use]
    pub fn calendar_fields(&self, value: &DateValue) -> (i32, u32, u32) {
        let date = self.local_date(value);
        (date.year(), date.month(), date.day())
    }

    /// Start of a local calendar day.
    #[must_use]
    pub fn midnight(&self, date: NaiveDate) -> Option<DateValue> {
        self.resolve_local(date.and_time(NaiveTime::MIN))
    }

    /// Resolves a local wall-clock time to an instant.
    ///
    /// Ambiguous times take the earlier instant. Times inside a DST gap move
    /// forward by one hour.
    #[must_use]
    pub fn resolve_local(&self, local: NaiveDateTime) -> Option<DateValue> {
        match self {
            Self::System => resolve_in(&Local, local),
            Self::Fixed(offset) => resolve_in(offset, local),
        }
    }
}

fn resolve_in<Tz: TimeZone>(zone: &Tz, local: NaiveDateTime) -> Option<DateValue> {
    let resolved: Option<DateTime<Tz>> = zone.from_local_datetime(&local).earliest().or_else(|| {
        let shifted = local.checked_add_signed(TimeDelta::hours(1))?;
        zone.from_local_datetime(&shifted).earliest()
    });
    resolved.and_then(|dt| DateValue::from_datetime(&dt))
}

impl FromStr for LocalZone {
    type Err = NormalizeError;

    /// Accepts `system`/`local`, `utc`/`Z`, and offsets such as `+05:30`,
    /// `-0800` or `+02`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("system") || trimmed.eq_ignore_ascii_case("local") {
            return Ok(Self::System);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(Self::utc());
        }
        parse_offset(trimmed)
            .map(Self::Fixed)
            .ok_or_else(|| NormalizeError::InvalidZone(value.to_string()))
    }
}

fn parse_offset(value: &str) -> Option<FixedOffset> {
    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl fmt::Display for LocalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl Serialize for LocalZone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocalZone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zone_names() {
        assert_eq!("system".parse::<LocalZone>().unwrap(), LocalZone::System);
        assert_eq!("Local".parse::<LocalZone>().unwrap(), LocalZone::System);
        assert_eq!("UTC".parse::<LocalZone>().unwrap(), LocalZone::utc());
        assert_eq!("Z".parse::<LocalZone>().unwrap(), LocalZone::utc());
    }

    #[test]
    fn test_parse_offsets() {
        assert_eq!(
            "+05:30".parse::<LocalZone>().unwrap(),
            LocalZone::east(5 * 3600 + 30 * 60).unwrap()
        );
        assert_eq!(
            "-0800".parse::<LocalZone>().unwrap(),
            LocalZone::east(-8 * 3600).unwrap()
        );
        assert_eq!(
            "+02".parse::<LocalZone>().unwrap(),
            LocalZone::east(2 * 3600).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_bad_offsets() {
        for bad in ["", "05:30", "+25:00", "+05:75", "+5", "+05:3x", "Europe/Paris"] {
            assert!(
                matches!(bad.parse::<LocalZone>(), Err(NormalizeError::InvalidZone(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_calendar_fields_follow_offset() {
        // 2024-01-15T22:00:00Z
        let value = DateValue::from_epoch_millis(1_705_356_000_000).unwrap();
        assert_eq!(LocalZone::utc().calendar_fields(&value), (2024, 1, 15));
        let tokyo = LocalZone::east(9 * 3600).unwrap();
        assert_eq!(tokyo.calendar_fields(&value), (2024, 1, 16));
    }

    #[test]
    fn test_midnight_in_fixed_offset() {
        let zone = LocalZone::east(2 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let value = zone.midnight(date).unwrap();
        assert_eq!(value.to_string(), "2024-02-29T22:00:00.000Z");
    }

    #[test]
    fn test_zone_serde_uses_text() {
        let zone: LocalZone = serde_json::from_str("\"+01:00\"").unwrap();
        assert_eq!(zone, LocalZone::east(3600).unwrap());
        assert_eq!(serde_json::to_string(&zone).unwrap(), "\"+01:00\"");
        assert!(serde_json::from_str::<LocalZone>("\"bogus\"").is_err());
    }
}
