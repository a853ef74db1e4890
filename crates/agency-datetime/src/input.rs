//! Source representations accepted by the normalizer.

use std::fmt;

use serde_json::Value;

use crate::error::{NormalizeError, Result};
use crate::value::{Convertible, DateValue, LegacyTimestamp};

/// A date-like value handed to the normalizer.
///
/// The closed set of shapes callers can pass in. Which variant a value lands
/// in decides nothing on its own: the normalizer still tries every
/// interpretation in order.
#[derive(Clone, Copy)]
pub enum DateInput<'a> {
    /// An already-canonical value.
    Canonical(DateValue),
    /// Any value that can produce a canonical value itself.
    Convertible(&'a dyn Convertible),
    /// A seconds/nanoseconds record from the persistence system.
    Legacy(LegacyTimestamp),
    /// An epoch number, in seconds or milliseconds.
    Number(f64),
    /// Free text: numeric, day/month/year, ISO or RFC 2822.
    Text(&'a str),
}

impl<'a> DateInput<'a> {
    /// Classifies a JSON value from an API payload or form submission.
    ///
    /// Numbers and strings map directly; objects need a numeric `seconds` or
    /// `_seconds` field. Everything else is rejected.
    pub fn from_json(value: &'a Value) -> Result<Self> {
        match value {
            Value::Number(number) => number
                .as_f64()
                .map(Self::Number)
                .ok_or_else(|| NormalizeError::unrecognised(value)),
            Value::String(text) => Ok(Self::Text(text.as_str())),
            Value::Object(fields) => {
                let has_seconds = ["seconds", "_seconds"]
                    .into_iter()
                    .filter_map(|key| fields.get(key))
                    .find(|field| !field.is_null())
                    .is_some_and(Value::is_number);
                if !has_seconds {
                    return Err(NormalizeError::unrecognised(value));
                }
                serde_json::from_value::<LegacyTimestamp>(value.clone())
                    .map(Self::Legacy)
                    .map_err(|_| NormalizeError::unrecognised(value))
            }
            Value::Null | Value::Bool(_) | Value::Array(_) => {
                Err(NormalizeError::unrecognised(value))
            }
        }
    }

    /// Short name of the input shape, safe to log.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Canonical(_) => "canonical",
            Self::Convertible(_) => "convertible",
            Self::Legacy(_) => "legacy_timestamp",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }

    /// Whether the input counts as "no value" for optional date fields.
    ///
    /// Empty strings, zero and NaN are absent; whitespace-only strings are not.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Number(number) => *number == 0.0 || number.is_nan(),
            Self::Canonical(_) | Self::Convertible(_) | Self::Legacy(_) => false,
        }
    }
}

/// Parses decimal epoch text such as `"1700000000"` or `" -12.5 "`.
///
/// Surrounding whitespace and a leading sign are allowed. Blank text,
/// exponents, hex, `NaN` and `Infinity` are not numbers here.
#[must_use]
pub fn parse_epoch_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

impl fmt::Display for DateInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canonical(value) => write!(f, "{value}"),
            Self::Convertible(value) => write!(f, "{}", value.to_date_value()),
            Self::Legacy(ts) => write!(f, "{ts}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl fmt::Debug for DateInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canonical(value) => f.debug_tuple("Canonical").field(value).finish(),
            Self::Convertible(_) => f.write_str("Convertible(..)"),
            Self::Legacy(ts) => f.debug_tuple("Legacy").field(ts).finish(),
            Self::Number(number) => f.debug_tuple("Number").field(number).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
        }
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for DateInput<'_> {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<i64> for DateInput<'_> {
    fn from(number: i64) -> Self {
        // Epochs are well inside the exactly representable range.
        Self::Number(number as f64)
    }
}

impl From<i32> for DateInput<'_> {
    fn from(number: i32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl From<u32> for DateInput<'_> {
    fn from(number: u32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl From<LegacyTimestamp> for DateInput<'_> {
    fn from(ts: LegacyTimestamp) -> Self {
        Self::Legacy(ts)
    }
}

impl From<DateValue> for DateInput<'_> {
    fn from(value: DateValue) -> Self {
        Self::Canonical(value)
    }
}

impl<'a> From<&'a dyn Convertible> for DateInput<'a> {
    fn from(value: &'a dyn Convertible) -> Self {
        Self::Convertible(value)
    }
}
