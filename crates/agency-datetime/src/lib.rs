//! Date normalization for the agency admin dashboard.
//!
//! Form fields, API responses and the persistence SDK all hand over dates in
//! different shapes: epoch seconds or milliseconds, numeric strings,
//! `DD/MM/YYYY` text, ISO strings and `{seconds, nanoseconds}` records. This
//! crate collapses them into one [`DateValue`] and projects that value back
//! into the encodings each consumer expects.
//!
//! # Module Organization
//!
//! - [`value`]: the canonical [`DateValue`], [`LegacyTimestamp`] and the
//!   [`Convertible`] capability
//! - [`input`]: [`DateInput`], the accepted source shapes
//! - [`zone`]: [`LocalZone`], what "local calendar" means
//! - [`normalize`]: the ordered [`Interpretation`] chain and [`Normalizer`]
//! - [`format`]: UI, API, ISO and timestamp projections
//! - [`serde_helpers`]: `#[serde(with = ...)]` adapters for payload fields
//!
//! # Example
//!
//! ```
//! use agency_datetime::{LegacyTimestamp, LocalZone, Normalizer};
//!
//! let normalizer = Normalizer::with_zone(LocalZone::utc());
//!
//! assert_eq!(normalizer.format_for_ui("1700000000").unwrap(), "14/11/2023");
//! assert_eq!(normalizer.format_for_api("01/02/23").unwrap(), "02/01/2023");
//! assert_eq!(
//!     normalizer.to_timestamp(LegacyTimestamp::new(1_700_000_000, 0)).unwrap(),
//!     LegacyTimestamp::new(1_700_000_000, 0)
//! );
//! ```

pub mod error;
pub mod format;
pub mod input;
pub mod normalize;
pub mod serde_helpers;
pub mod value;
pub mod zone;

pub use error::{NormalizeError, Result};
pub use format::{
    OutputFormat, format_dd_mm_yyyy, format_for_api, format_for_ui, format_mm_dd_yyyy,
    format_utc_midnight, to_timestamp, to_utc_iso_string,
};
pub use input::{DateInput, parse_epoch_number};
pub use normalize::{
    EPOCH_MILLIS_THRESHOLD, Interpretation, Normalizer, NormalizerOptions, TWO_DIGIT_YEAR_BASE,
    parse_date,
};
pub use value::{Convertible, DateValue, LegacyTimestamp, MAX_EPOCH_MILLIS};
pub use zone::LocalZone;
