//! Property tests for the normalizer.

use agency_datetime::{DateValue, Interpretation, LocalZone, Normalizer};
use proptest::prelude::*;

// 1900-01-01 .. 2100-01-01 in epoch milliseconds; four-digit years only
const MIN_MILLIS: i64 = -2_208_988_800_000;
const MAX_MILLIS: i64 = 4_102_444_800_000;

fn zone_strategy() -> impl Strategy<Value = LocalZone> {
    // Whole quarter hours between UTC-12 and UTC+14.
    (-48i32..=56).prop_map(|quarters| LocalZone::east(quarters * 15 * 60).unwrap())
}

proptest! {
    #[test]
    fn ui_format_round_trips_calendar_day(millis in MIN_MILLIS..MAX_MILLIS, zone in zone_strategy()) {
        let normalizer = Normalizer::with_zone(zone);
        let original = DateValue::from_epoch_millis(millis).unwrap();
        let shown = normalizer.format_dd_mm_yyyy(&original);

        let (interpretation, reparsed) = normalizer.interpret(shown.as_str()).unwrap();
        prop_assert_eq!(interpretation, Interpretation::DelimitedDate);
        prop_assert_eq!(
            reparsed.calendar_fields(&zone),
            original.calendar_fields(&zone)
        );
    }

    #[test]
    fn api_format_is_utc_date_of_value(millis in MIN_MILLIS..MAX_MILLIS, zone in zone_strategy()) {
        let normalizer = Normalizer::with_zone(zone);
        let value = DateValue::from_epoch_millis(millis).unwrap();
        let expected = value.as_utc().format("%m/%d/%Y").to_string();
        prop_assert_eq!(normalizer.format_mm_dd_yyyy(&value), expected);
    }

    #[test]
    fn timestamp_pair_reassembles_to_same_millis(millis in MIN_MILLIS..MAX_MILLIS) {
        let normalizer = Normalizer::with_zone(LocalZone::utc());
        let value = DateValue::from_epoch_millis(millis).unwrap();
        let ts = normalizer.to_timestamp(value).unwrap();
        prop_assert!((0..1_000_000_000).contains(&ts.nanoseconds));
        prop_assert_eq!(ts.nanoseconds % 1_000_000, 0);
        prop_assert_eq!(ts.to_epoch_millis(), Some(value.epoch_millis()));
    }
}
