//! Tests for option resolution and value collection.

use std::fs;
use std::path::PathBuf;

use agency_cli::config::{load_options, resolve_options};
use agency_cli::values::{collect_values, read_values};
use agency_datetime::{LocalZone, NormalizerOptions};

fn options_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "agency_dates_{}_{name}.json",
        std::process::id()
    ));
    fs::write(&path, contents).unwrap();
    path
}

fn zone(text: &str) -> LocalZone {
    text.parse().unwrap()
}

// =========================================================================
// Options
// =========================================================================

#[test]
fn test_options_file_sets_zone() {
    let path = options_file("sets_zone", r#"{ "local_zone": "+10:00" }"#);
    let options = load_options(&path).unwrap();
    assert_eq!(options.local_zone, zone("+10:00"));
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_utc_offset_overrides_options_file() {
    let path = options_file("override", r#"{ "local_zone": "+10:00" }"#);
    let options = resolve_options(Some(&path), Some(zone("-03:00"))).unwrap();
    assert_eq!(options.local_zone, zone("-03:00"));

    let options = resolve_options(Some(&path), None).unwrap();
    assert_eq!(options.local_zone, zone("+10:00"));
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_defaults_without_file_or_offset() {
    assert_eq!(
        resolve_options(None, None).unwrap(),
        NormalizerOptions::default()
    );
    assert_eq!(
        resolve_options(None, Some(LocalZone::utc())).unwrap().local_zone,
        LocalZone::utc()
    );
}

#[test]
fn test_empty_options_object_uses_system_zone() {
    let path = options_file("empty", "{}");
    assert_eq!(load_options(&path).unwrap().local_zone, LocalZone::System);
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_malformed_options_file_is_reported() {
    let path = options_file("malformed", r#"{ "local_zone": "+99:99" "#);
    let err = resolve_options(Some(&path), Some(LocalZone::utc())).unwrap_err();
    assert!(err.to_string().starts_with("parse options file"));
    fs::remove_file(&path).unwrap();

    let path = options_file("bad_zone", r#"{ "local_zone": "mars" }"#);
    let err = load_options(&path).unwrap_err();
    assert!(format!("{err:#}").contains("invalid zone offset: mars"));
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_missing_options_file_is_reported() {
    let path = std::env::temp_dir().join("agency_dates_does_not_exist.json");
    let err = load_options(&path).unwrap_err();
    assert!(err.to_string().starts_with("read options file"));
}

// =========================================================================
// Values
// =========================================================================

#[test]
fn test_reader_values_skip_blank_lines() {
    let input = "15/01/2024\n\n   \n1700000000\n";
    assert_eq!(
        read_values(input.as_bytes()).unwrap(),
        ["15/01/2024", "1700000000"]
    );
}

#[test]
fn test_given_values_ignore_reader() {
    let given = vec!["2024-01-01".to_string()];
    assert_eq!(
        collect_values(&given, "ignored\n".as_bytes()).unwrap(),
        ["2024-01-01"]
    );
}

#[test]
fn test_no_values_is_an_error() {
    let err = collect_values(&[], "\n  \n".as_bytes()).unwrap_err();
    assert_eq!(err.to_string(), "no values given");
}
