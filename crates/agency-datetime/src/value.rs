//! Canonical date value and the legacy seconds/nanoseconds encoding.

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::zone::LocalZone;

/// Largest distance from the epoch, in milliseconds, that a date may have.
///
/// The last whole millisecond chrono can represent,
/// `+262143-12-31T23:59:59.999Z`. The same magnitude is used before the
/// epoch so the range stays symmetric.
pub const MAX_EPOCH_MILLIS: i64 = 8_210_298_412_799_999;

/// The canonical in-memory date value.
///
/// An absolute instant with millisecond precision. Every parser collapses to
/// this type and every formatter projects from it; it never changes once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateValue(DateTime<Utc>);

impl DateValue {
    /// Builds a value from milliseconds since 1970-01-01T00:00:00Z.
    ///
    /// Returns `None` when the value is outside [`MAX_EPOCH_MILLIS`].
    #[must_use]
    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        if !(-MAX_EPOCH_MILLIS..=MAX_EPOCH_MILLIS).contains(&millis) {
            return None;
        }
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Builds a value from a chrono date-time, dropping sub-millisecond digits.
    #[must_use]
    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Option<Self> {
        Self::from_epoch_millis(datetime.timestamp_millis())
    }

    /// Milliseconds since 1970-01-01T00:00:00Z.
    #[must_use]
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// The instant as a UTC date-time.
    #[must_use]
    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }

    /// The instant as a date-time in the given zone.
    #[must_use]
    pub fn with_zone(&self, zone: &LocalZone) -> DateTime<FixedOffset> {
        match zone {
            LocalZone::System => self.0.with_timezone(&Local).fixed_offset(),
            LocalZone::Fixed(offset) => self.0.with_timezone(offset),
        }
    }

    /// Calendar year, month (1-12) and day in the given zone.
    #[must_use]
    pub fn calendar_fields(&self, zone: &LocalZone) -> (i32, u32, u32) {
        zone.calendar_fields(self)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// A value that knows how to produce a canonical date on its own.
///
/// Wrappers from external SDKs implement this so the normalizer can accept
/// them without knowing their concrete type.
pub trait Convertible {
    /// Produces the canonical date this value stands for.
    fn to_date_value(&self) -> DateValue;
}

impl Convertible for DateValue {
    fn to_date_value(&self) -> DateValue {
        *self
    }
}

impl<Tz: TimeZone> Convertible for DateTime<Tz> {
    fn to_date_value(&self) -> DateValue {
        let utc = self.with_timezone(&Utc);
        // Sub-millisecond digits are not part of the canonical value.
        let millis_only = (utc.nanosecond() / 1_000_000) * 1_000_000;
        DateValue(utc.with_nanosecond(millis_only).unwrap_or(utc))
    }
}

/// The external persistence system's timestamp encoding.
///
/// Accepts both the SDK field names (`seconds`, `nanoseconds`) and the REST
/// field names (`_seconds`, `_nanoseconds`) when reading; always writes the
/// REST names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireTimestamp")]
pub struct LegacyTimestamp {
    /// Whole seconds since the epoch.
    #[serde(rename = "_seconds")]
    pub seconds: i64,
    /// Nanoseconds past `seconds`; missing or null on the wire means zero.
    #[serde(rename = "_nanoseconds")]
    pub nanoseconds: i64,
}

/// Both spellings as they arrive. The SDK names win when both are set, and
/// numbers may be fractional.
#[derive(Deserialize)]
struct WireTimestamp {
    seconds: Option<f64>,
    #[serde(rename = "_seconds")]
    rest_seconds: Option<f64>,
    nanoseconds: Option<f64>,
    #[serde(rename = "_nanoseconds")]
    rest_nanoseconds: Option<f64>,
}

impl TryFrom<WireTimestamp> for LegacyTimestamp {
    type Error = String;

    fn try_from(wire: WireTimestamp) -> Result<Self, Self::Error> {
        let seconds = wire
            .seconds
            .or(wire.rest_seconds)
            .ok_or_else(|| "missing field `seconds`".to_string())?;
        let nanoseconds = wire.nanoseconds.or(wire.rest_nanoseconds).unwrap_or(0.0);
        let whole = seconds.floor();
        let nanoseconds = ((seconds - whole) * 1e9).round() + nanoseconds.round();
        if !whole.is_finite() || !nanoseconds.is_finite() {
            return Err("timestamp fields must be finite".to_string());
        }
        // Keep well inside i64 so the millisecond arithmetic cannot wrap.
        if whole.abs() > 9.2e15 || nanoseconds.abs() > 9.2e18 {
            return Err("timestamp out of range".to_string());
        }
        Ok(Self::new(whole as i64, nanoseconds as i64))
    }
}

impl LegacyTimestamp {
    /// Creates a timestamp from its two fields.
    #[must_use]
    pub const fn new(seconds: i64, nanoseconds: i64) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }

    /// Milliseconds since the epoch: `seconds * 1000 + round(nanoseconds / 1e6)`.
    ///
    /// Halves round upward. Returns `None` on overflow.
    #[must_use]
    pub fn to_epoch_millis(&self) -> Option<i64> {
        let rounded = self.nanoseconds.checked_add(500_000)?.div_euclid(1_000_000);
        self.seconds.checked_mul(1000)?.checked_add(rounded)
    }

    /// Splits a canonical value into whole seconds and a nanosecond remainder.
    ///
    /// The remainder only carries millisecond precision.
    #[must_use]
    pub fn from_date_value(value: &DateValue) -> Self {
        let millis = value.epoch_millis();
        Self {
            seconds: millis.div_euclid(1000),
            nanoseconds: millis.rem_euclid(1000) * 1_000_000,
        }
    }
}

impl From<DateValue> for LegacyTimestamp {
    fn from(value: DateValue) -> Self {
        Self::from_date_value(&value)
    }
}

impl fmt::Display for LegacyTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ _seconds: {}, _nanoseconds: {} }}",
            self.seconds, self.nanoseconds
        )
    }
}
