//! `#[serde(with = ...)]` adapters for date fields in API payloads.
//!
//! ```
//! use agency_datetime::DateValue;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct IntakeRequest {
//!     #[serde(with = "agency_datetime::serde_helpers::api_date")]
//!     start_date: DateValue,
//!     #[serde(default, with = "agency_datetime::serde_helpers::option_api_date")]
//!     deadline: Option<DateValue>,
//! }
//!
//! let request: IntakeRequest =
//!     serde_json::from_str(r#"{ "start_date": 1704067200, "deadline": null }"#).unwrap();
//! assert_eq!(
//!     serde_json::to_string(&request).unwrap(),
//!     r#"{"start_date":"01/01/2024","deadline":null}"#
//! );
//! ```

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::Result;
use crate::normalize::Normalizer;
use crate::value::DateValue;

/// The API's own output shape: month first, four-digit year.
static API_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}$").expect("api date pattern is valid")
});

/// API dates are `MM/DD/YYYY` at UTC midnight.
///
/// Only four-digit years qualify; `01/02/23` is left to the normalizer and its
/// two-digit year rule.
fn parse_api_text(value: &Value) -> Option<DateValue> {
    let text = value.as_str()?.trim();
    if !API_DATE.is_match(text) {
        return None;
    }
    let date = NaiveDate::parse_from_str(text, "%m/%d/%Y").ok()?;
    DateValue::from_datetime(&date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn normalize_value(value: &Value) -> Result<DateValue> {
    match parse_api_text(value) {
        Some(date) => Ok(date),
        None => Normalizer::default().parse_json(value),
    }
}

/// `DateValue` as `MM/DD/YYYY`.
///
/// Reading accepts the API's own `MM/DD/YYYY` text first, so a field reads
/// back what it wrote: `"01/02/2024"` is 2 January here, while
/// [`Normalizer::parse`] reads the same text day first. Anything else,
/// including two-digit years and impossible month/day pairs such as
/// `"15/01/2024"`, goes through the normalizer.
pub mod api_date {
    use serde::{Deserializer, Serializer};

    use super::{DateValue, Deserialize, Value, normalize_value};
    use crate::format::format_mm_dd_yyyy;

    pub fn serialize<S: Serializer>(value: &DateValue, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_mm_dd_yyyy(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateValue, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        normalize_value(&raw).map_err(serde::de::Error::custom)
    }
}

/// `Option<DateValue>` as `MM/DD/YYYY` or `null`.
pub mod option_api_date {
    use serde::{Deserializer, Serializer};

    use super::{DateValue, Deserialize, Value, normalize_value};
    use crate::format::format_mm_dd_yyyy;

    pub fn serialize<S: Serializer>(
        value: &Option<DateValue>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&format_mm_dd_yyyy(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateValue>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            raw => normalize_value(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// `DateValue` as `{ "_seconds": .., "_nanoseconds": .. }`.
///
/// Reading accepts any shape the normalizer accepts.
pub mod legacy_timestamp {
    use serde::{Deserializer, Serialize, Serializer};

    use super::{DateValue, Deserialize, Value};
    use crate::normalize::Normalizer;
    use crate::value::LegacyTimestamp;

    pub fn serialize<S: Serializer>(value: &DateValue, serializer: S) -> Result<S::Ok, S::Error> {
        LegacyTimestamp::from_date_value(value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateValue, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Normalizer::default()
            .parse_json(&raw)
            .map_err(serde::de::Error::custom)
    }
}

/// Deserializes a date field of any accepted shape with a specific normalizer.
///
/// For callers that need a fixed local zone rather than the host zone.
pub fn deserialize_with<'de, D: Deserializer<'de>>(
    normalizer: &Normalizer,
    deserializer: D,
) -> std::result::Result<DateValue, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    normalizer.parse_json(&raw).map_err(D::Error::custom)
}
