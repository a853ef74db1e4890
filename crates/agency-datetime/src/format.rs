//! Output projections of a [`DateValue`].
//!
//! UI screens show `DD/MM/YYYY` in the local calendar, the API expects
//! `MM/DD/YYYY` in UTC, date-only fields travel as midnight ISO strings, and
//! the persistence system wants `{_seconds, _nanoseconds}`. Every projection
//! is total over a valid value; only parsing a raw input can fail.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::DateInput;
use crate::normalize::Normalizer;
use crate::value::{DateValue, LegacyTimestamp};
use crate::zone::LocalZone;

/// `DD/MM/YYYY` from local calendar fields.
#[must_use]
pub fn format_dd_mm_yyyy(value: &DateValue, zone: &LocalZone) -> String {
    let (year, month, day) = zone.calendar_fields(value);
    format!("{day:02}/{month:02}/{year}")
}

/// `MM/DD/YYYY` from UTC calendar fields.
#[must_use]
pub fn format_mm_dd_yyyy(value: &DateValue) -> String {
    let date = value.as_utc().date_naive();
    format!("{:02}/{:02}/{}", date.month(), date.day(), date.year())
}

/// `YYYY-MM-DDT00:00:00.000Z` for the local calendar date of `value`.
///
/// Years outside 0..=9999 use the expanded `+YYYYYY`/`-YYYYYY` form.
#[must_use]
pub fn format_utc_midnight(value: &DateValue, zone: &LocalZone) -> String {
    let (year, month, day) = zone.calendar_fields(value);
    let year = if (0..=9999).contains(&year) {
        format!("{year:04}")
    } else if year < 0 {
        format!("-{:06}", year.unsigned_abs())
    } else {
        format!("+{year:06}")
    };
    format!("{year}-{month:02}-{day:02}T00:00:00.000Z")
}

impl Normalizer {
    /// `DD/MM/YYYY` in this normalizer's local calendar.
    #[must_use]
    pub fn format_dd_mm_yyyy(&self, value: &DateValue) -> String {
        format_dd_mm_yyyy(value, self.local_zone())
    }

    /// `MM/DD/YYYY` in UTC.
    #[must_use]
    pub fn format_mm_dd_yyyy(&self, value: &DateValue) -> String {
        format_mm_dd_yyyy(value)
    }

    /// Normalizes then formats for outbound API payloads (`MM/DD/YYYY`).
    pub fn format_for_api<'a>(&self, input: impl Into<DateInput<'a>>) -> Result<String> {
        self.parse(input).map(|value| format_mm_dd_yyyy(&value))
    }

    /// Normalizes then formats for display (`DD/MM/YYYY`).
    pub fn format_for_ui<'a>(&self, input: impl Into<DateInput<'a>>) -> Result<String> {
        self.parse(input)
            .map(|value| format_dd_mm_yyyy(&value, self.local_zone()))
    }

    /// Date-only ISO string, or `None` when there is no input.
    ///
    /// Missing inputs, empty strings, zero and NaN all count as "no input";
    /// this is deliberately looser than [`Normalizer::parse`], which reads
    /// zero as 1970-01-01. The time of day is always dropped.
    ///
    /// # Errors
    ///
    /// Fails like [`Normalizer::parse`] when a present input is unparseable.
    pub fn to_utc_iso_string<'a, I>(&self, input: Option<I>) -> Result<Option<String>>
    where
        I: Into<DateInput<'a>>,
    {
        let Some(input) = input.map(Into::into) else {
            return Ok(None);
        };
        if input.is_absent() {
            return Ok(None);
        }
        let value = self.parse(input)?;
        Ok(Some(format_utc_midnight(&value, self.local_zone())))
    }

    /// Normalizes an input into the persistence system's timestamp pair.
    ///
    /// Nanoseconds only carry millisecond precision.
    pub fn to_timestamp<'a>(&self, input: impl Into<DateInput<'a>>) -> Result<LegacyTimestamp> {
        self.parse(input)
            .map(|value| LegacyTimestamp::from_date_value(&value))
    }
}

/// Normalizes with the host zone and formats for outbound API payloads.
pub fn format_for_api<'a>(input: impl Into<DateInput<'a>>) -> Result<String> {
    Normalizer::default().format_for_api(input)
}

/// Normalizes with the host zone and formats for display.
pub fn format_for_ui<'a>(input: impl Into<DateInput<'a>>) -> Result<String> {
    Normalizer::default().format_for_ui(input)
}

/// Date-only ISO string using the host zone; see [`Normalizer::to_utc_iso_string`].
pub fn to_utc_iso_string<'a, I>(input: Option<I>) -> Result<Option<String>>
where
    I: Into<DateInput<'a>>,
{
    Normalizer::default().to_utc_iso_string(input)
}

/// Timestamp pair for any date-like input.
pub fn to_timestamp<'a>(input: impl Into<DateInput<'a>>) -> Result<LegacyTimestamp> {
    Normalizer::default().to_timestamp(input)
}

/// A projection picked at run time (CLI flags, configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `DD/MM/YYYY`, local calendar.
    Ui,
    /// `MM/DD/YYYY`, UTC calendar.
    Api,
    /// `YYYY-MM-DDT00:00:00.000Z`.
    Iso,
    /// `{ _seconds, _nanoseconds }` as JSON.
    Timestamp,
    /// Full RFC 3339 with milliseconds.
    #[default]
    Rfc3339,
}

impl OutputFormat {
    /// Every format, in display order.
    pub const ALL: [Self; 5] = [
        Self::Ui,
        Self::Api,
        Self::Iso,
        Self::Timestamp,
        Self::Rfc3339,
    ];

    /// Stable name used on the command line.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ui => "ui",
            Self::Api => "api",
            Self::Iso => "iso",
            Self::Timestamp => "timestamp",
            Self::Rfc3339 => "rfc3339",
        }
    }

    /// Projects a value with the given normalizer's local zone.
    #[must_use]
    pub fn render(&self, normalizer: &Normalizer, value: &DateValue) -> String {
        match self {
            Self::Ui => normalizer.format_dd_mm_yyyy(value),
            Self::Api => normalizer.format_mm_dd_yyyy(value),
            Self::Iso => format_utc_midnight(value, normalizer.local_zone()),
            Self::Timestamp => {
                let ts = LegacyTimestamp::from_date_value(value);
                format!(
                    "{{\"_seconds\":{},\"_nanoseconds\":{}}}",
                    ts.seconds, ts.nanoseconds
                )
            }
            Self::Rfc3339 => value.to_string(),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown output format: {value}"))
    }
}
