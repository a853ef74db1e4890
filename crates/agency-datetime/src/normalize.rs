//! Date normalization.
//!
//! Turns any [`DateInput`] into a [`DateValue`] by trying a fixed list of
//! interpretations in order. The first interpretation that produces a valid
//! date wins; the order is part of the contract with existing callers and
//! must not change.
//!
//! # Interpretation order
//!
//! 1. [`Interpretation::Convertible`]: canonical values and [`Convertible`]
//!    wrappers return their own value.
//! 2. [`Interpretation::LegacyTimestamp`]: `seconds * 1000 + round(nanos / 1e6)`.
//! 3. [`Interpretation::Epoch`]: numbers and numeric strings. Magnitudes below
//!    `1e12` are seconds, the rest are milliseconds.
//! 4. [`Interpretation::DelimitedDate`]: `D/M/Y` or `D-M-Y` text at local
//!    midnight; two-digit years land in the 2000s.
//! 5. [`Interpretation::NativeParse`]: ISO 8601, RFC 3339, RFC 2822 and a few
//!    human-readable forms.
//!
//! Nothing matched means [`NormalizeError::UnrecognisedDateFormat`].
//!
//! [`Convertible`]: crate::value::Convertible

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{NormalizeError, Result};
use crate::input::{DateInput, parse_epoch_number};
use crate::value::{DateValue, MAX_EPOCH_MILLIS};
use crate::zone::LocalZone;

/// Epoch numbers at or above this magnitude are already milliseconds.
///
/// Second-based epochs stay below it until the year 33658; millisecond epochs
/// pass it from 2001-09-09 onward.
pub const EPOCH_MILLIS_THRESHOLD: f64 = 1e12;

/// Offset added to two-digit years in day/month/year text.
pub const TWO_DIGIT_YEAR_BASE: i32 = 2000;

static DELIMITED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})[/-]([0-9]{1,2})[/-]([0-9]{2,4})/?$")
        .expect("delimited date pattern is valid")
});

static ISO_YEAR_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})$").expect("year-month pattern is valid")
});

/// One way of reading a date input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interpretation {
    /// The input already is, or can produce, a canonical value.
    Convertible,
    /// A seconds/nanoseconds record.
    LegacyTimestamp,
    /// An epoch number or numeric string.
    Epoch,
    /// Day/month/year text with `/` or `-` separators.
    DelimitedDate,
    /// Anything the general-purpose date parser accepts.
    NativeParse,
}

impl Interpretation {
    /// Every interpretation, in the order they are tried.
    pub const ORDER: [Self; 5] = [
        Self::Convertible,
        Self::LegacyTimestamp,
        Self::Epoch,
        Self::DelimitedDate,
        Self::NativeParse,
    ];

    /// Stable name used in logs and CLI output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Convertible => "convertible",
            Self::LegacyTimestamp => "legacy_timestamp",
            Self::Epoch => "epoch",
            Self::DelimitedDate => "delimited_date",
            Self::NativeParse => "native_parse",
        }
    }

    /// Tries this interpretation alone.
    #[must_use]
    pub fn attempt(&self, input: &DateInput<'_>, zone: &LocalZone) -> Option<DateValue> {
        match (self, input) {
            (Self::Convertible, DateInput::Canonical(value)) => Some(*value),
            (Self::Convertible, DateInput::Convertible(value)) => Some(value.to_date_value()),
            (Self::LegacyTimestamp, DateInput::Legacy(ts)) => {
                DateValue::from_epoch_millis(ts.to_epoch_millis()?)
            }
            (Self::Epoch, DateInput::Number(number)) => epoch_to_value(*number),
            (Self::Epoch, DateInput::Text(text)) => epoch_to_value(parse_epoch_number(text)?),
            (Self::DelimitedDate, DateInput::Text(text)) => parse_delimited_date(text, zone),
            (Self::NativeParse, DateInput::Text(text)) => parse_native(text, zone),
            _ => None,
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Options for a [`Normalizer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerOptions {
    /// Zone whose calendar is used for day/month/year text and UI output.
    #[serde(default)]
    pub local_zone: LocalZone,
}

impl NormalizerOptions {
    /// Options with the host zone as the local calendar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the zone used for local calendar fields.
    #[must_use]
    pub fn with_local_zone(mut self, zone: LocalZone) -> Self {
        self.local_zone = zone;
        self
    }
}

/// Parses date-like inputs into [`DateValue`]s.
///
/// Holds no state besides its options; share it freely between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalizer {
    options: NormalizerOptions,
}

impl Normalizer {
    /// Creates a normalizer with the given options.
    #[must_use]
    pub fn new(options: NormalizerOptions) -> Self {
        Self { options }
    }

    /// Creates a normalizer whose local calendar is `zone`.
    #[must_use]
    pub fn with_zone(zone: LocalZone) -> Self {
        Self::new(NormalizerOptions::new().with_local_zone(zone))
    }

    /// The options this normalizer was built with.
    #[must_use]
    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// The zone used for local calendar fields.
    #[must_use]
    pub fn local_zone(&self) -> &LocalZone {
        &self.options.local_zone
    }

    /// Normalizes a date-like input.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::UnrecognisedDateFormat`] with the original
    /// input when no interpretation applies.
    ///
    /// # Examples
    ///
    /// ```
    /// use agency_datetime::{LocalZone, Normalizer};
    ///
    /// let normalizer = Normalizer::with_zone(LocalZone::utc());
    /// let value = normalizer.parse("15/01/2024").unwrap();
    /// assert_eq!(value.to_string(), "2024-01-15T00:00:00.000Z");
    ///
    /// assert!(normalizer.parse("not-a-date-at-all").is_err());
    /// ```
    pub fn parse<'a>(&self, input: impl Into<DateInput<'a>>) -> Result<DateValue> {
        self.interpret(input).map(|(_, value)| value)
    }

    /// Normalizes an input and reports which interpretation matched.
    pub fn interpret<'a>(
        &self,
        input: impl Into<DateInput<'a>>,
    ) -> Result<(Interpretation, DateValue)> {
        let input = input.into();
        for interpretation in Interpretation::ORDER {
            if let Some(value) = interpretation.attempt(&input, self.local_zone()) {
                trace!(
                    kind = input.kind(),
                    interpretation = interpretation.label(),
                    epoch_millis = value.epoch_millis(),
                    "date input interpreted"
                );
                return Ok((interpretation, value));
            }
        }
        debug!(kind = input.kind(), "date input matched no interpretation");
        Err(NormalizeError::unrecognised(input))
    }

    /// Normalizes a JSON value taken from a payload.
    ///
    /// See [`DateInput::from_json`] for the accepted shapes.
    pub fn parse_json(&self, value: &serde_json::Value) -> Result<DateValue> {
        self.parse(DateInput::from_json(value)?)
    }
}

/// Normalizes a date-like input using the host's local zone.
///
/// See [`Normalizer::parse`].
pub fn parse_date<'a>(input: impl Into<DateInput<'a>>) -> Result<DateValue> {
    Normalizer::default().parse(input)
}

/// Applies the seconds/milliseconds rule to an epoch number.
fn epoch_to_value(number: f64) -> Option<DateValue> {
    if !number.is_finite() {
        return None;
    }
    let millis = if number.abs() < EPOCH_MILLIS_THRESHOLD {
        number * 1000.0
    } else {
        number
    }
    .trunc();
    if millis.abs() > MAX_EPOCH_MILLIS as f64 {
        return None;
    }
    DateValue::from_epoch_millis(millis as i64)
}

fn parse_delimited_date(text: &str, zone: &LocalZone) -> Option<DateValue> {
    let caps = DELIMITED_DATE.captures(text.trim())?;
    let day: i64 = caps[1].parse().ok()?;
    let month: i64 = caps[2].parse().ok()?;
    let year_text = &caps[3];
    let mut year: i32 = year_text.parse().ok()?;
    if year_text.len() == 2 {
        year += TWO_DIGIT_YEAR_BASE;
    }
    let date = lenient_calendar_date(year, month - 1, day)?;
    zone.midnight(date)
}

/// Builds a calendar date the way the browser date constructor does.
///
/// Years 0-99 mean 1900-1999, and an out-of-range month or day carries into
/// the neighbouring month or year instead of failing (`31/02` is `02/03`,
/// day 0 is the last day of the previous month).
fn lenient_calendar_date(year: i32, month0: i64, day: i64) -> Option<NaiveDate> {
    let year = if (0..=99).contains(&year) {
        year + 1900
    } else {
        year
    };
    let total_months = i64::from(year) * 12 + month0;
    let year = i32::try_from(total_months.div_euclid(12)).ok()?;
    let month = u32::try_from(total_months.rem_euclid(12) + 1).ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(TimeDelta::try_days(day - 1)?)
}

/// Formats read in the local zone when no offset is given.
const LOCAL_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d %Y %H:%M:%S",
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
];

const LOCAL_DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d-%B-%Y",
    "%a %B %d %Y",
    "%a, %d %B %Y",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%z",
];

/// General-purpose parsing for strings no earlier rule claimed.
fn parse_native(text: &str, zone: &LocalZone) -> Option<DateValue> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return DateValue::from_datetime(&dt);
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return DateValue::from_datetime(&dt);
        }
    }
    // `Z` suffix with a shortened time, e.g. 2024-01-15T10:30Z
    if let Some(naive) = trimmed.strip_suffix(['Z', 'z']).and_then(parse_local_datetime) {
        return DateValue::from_datetime(&naive.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return DateValue::from_datetime(&dt);
    }

    // Date-only ISO forms are UTC midnight, not local midnight.
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return DateValue::from_datetime(&date.and_time(NaiveTime::MIN).and_utc());
    }
    if let Some(caps) = ISO_YEAR_MONTH.captures(trimmed) {
        let date = NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, 1)?;
        return DateValue::from_datetime(&date.and_time(NaiveTime::MIN).and_utc());
    }

    if let Some(naive) = parse_local_datetime(trimmed) {
        return zone.resolve_local(naive);
    }
    LOCAL_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .and_then(|date| zone.midnight(date))
}

fn parse_local_datetime(text: &str) -> Option<NaiveDateTime> {
    LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc_date(value: DateValue) -> String {
        value.as_utc().format("%Y-%m-%d").to_string()
    }

    #[test]
    fn test_epoch_threshold_is_exclusive() {
        let seconds = epoch_to_value(999_999_999_999.0).unwrap();
        assert_eq!(seconds.epoch_millis(), 999_999_999_999_000);
        let millis = epoch_to_value(1_000_000_000_000.0).unwrap();
        assert_eq!(millis.epoch_millis(), 1_000_000_000_000);
    }

    #[test]
    fn test_epoch_rejects_non_finite_and_out_of_range() {
        assert!(epoch_to_value(f64::NAN).is_none());
        assert!(epoch_to_value(f64::INFINITY).is_none());
        assert!(epoch_to_value(9e15).is_none());
    }

    #[test]
    fn test_epoch_bound_is_chrono_range() {
        let edge = MAX_EPOCH_MILLIS as f64;
        assert_eq!(epoch_to_value(edge).unwrap().epoch_millis(), MAX_EPOCH_MILLIS);
        assert_eq!(epoch_to_value(-edge).unwrap().epoch_millis(), -MAX_EPOCH_MILLIS);
        assert!(epoch_to_value(edge + 1.0).is_none());
        // Inside the browser's range but past what chrono holds.
        assert!(epoch_to_value(8.5e15).is_none());
    }

    #[test]
    fn test_epoch_truncates_fractional_millis() {
        assert_eq!(epoch_to_value(1.0009).unwrap().epoch_millis(), 1000);
        assert_eq!(epoch_to_value(-1.0009).unwrap().epoch_millis(), -1000);
    }

    #[test]
    fn test_lenient_calendar_rolls_over() {
        let date = |y, m0, d| lenient_calendar_date(y, m0, d).unwrap().to_string();
        assert_eq!(date(2024, 1, 31), "2024-03-02");
        assert_eq!(date(2024, 12, 1), "2025-01-01");
        assert_eq!(date(2024, -1, 1), "2023-12-01");
        assert_eq!(date(2024, 2, 0), "2024-02-29");
        assert_eq!(date(99, 0, 1), "1999-01-01");
    }

    #[test]
    fn test_delimited_pattern_shapes() {
        let zone = LocalZone::utc();
        let parse = |text| parse_delimited_date(text, &zone).map(utc_date);
        assert_eq!(parse("5/3/2024").as_deref(), Some("2024-03-05"));
        assert_eq!(parse("05-03-2024").as_deref(), Some("2024-03-05"));
        assert_eq!(parse("05/03/2024/").as_deref(), Some("2024-03-05"));
        assert_eq!(parse(" 05/03/24 ").as_deref(), Some("2024-03-05"));
        assert_eq!(parse("05/03/124").as_deref(), Some("0124-03-05"));
        assert_eq!(parse("2024/03/05"), None);
        assert_eq!(parse("05/03/20245"), None);
        assert_eq!(parse("05.03.2024"), None);
    }

    #[test]
    fn test_native_parse_forms() {
        let zone = LocalZone::utc();
        let parse = |text| parse_native(text, &zone).map(|v| v.to_string());
        assert_eq!(
            parse("2024-01-15T10:30:00+02:00").as_deref(),
            Some("2024-01-15T08:30:00.000Z")
        );
        assert_eq!(
            parse("2024-01-15T10:30Z").as_deref(),
            Some("2024-01-15T10:30:00.000Z")
        );
        assert_eq!(
            parse("Mon, 15 Jan 2024 10:30:00 GMT").as_deref(),
            Some("2024-01-15T10:30:00.000Z")
        );
        assert_eq!(
            parse("2024-01").as_deref(),
            Some("2024-01-01T00:00:00.000Z")
        );
        assert_eq!(
            parse("January 15, 2024").as_deref(),
            Some("2024-01-15T00:00:00.000Z")
        );
        assert_eq!(
            parse("Mon Jan 15 2024").as_deref(),
            Some("2024-01-15T00:00:00.000Z")
        );
        assert_eq!(parse("not-a-date-at-all"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_iso_date_only_is_utc_but_datetime_is_local() {
        let zone = LocalZone::east(3 * 3600).unwrap();
        assert_eq!(
            parse_native("2024-01-15", &zone).unwrap().to_string(),
            "2024-01-15T00:00:00.000Z"
        );
        assert_eq!(
            parse_native("2024-01-15T03:00:00", &zone)
                .unwrap()
                .to_string(),
            "2024-01-15T00:00:00.000Z"
        );
    }

    #[test]
    fn test_interpretation_order_is_stable() {
        let labels: Vec<_> = Interpretation::ORDER.iter().map(Interpretation::label).collect();
        assert_eq!(
            labels,
            [
                "convertible",
                "legacy_timestamp",
                "epoch",
                "delimited_date",
                "native_parse"
            ]
        );
    }
}
