//! Tests for the CLI reports and their rendering.

use agency_cli::report::{BatchSummary, InputMode, build_table, normalize_all, render_lines};
use agency_datetime::{LocalZone, Normalizer, OutputFormat};
use insta::assert_snapshot;

fn utc() -> Normalizer {
    Normalizer::with_zone(LocalZone::utc())
}

// =========================================================================
// Parse Table
// =========================================================================

#[test]
fn test_parse_table_lists_interpretations() {
    let reports = normalize_all(
        &utc(),
        &["1700000000", "01/02/23", "soon"],
        InputMode::Text,
        OutputFormat::Rfc3339,
    );
    let mut table = build_table(&reports, OutputFormat::Rfc3339);
    table.force_no_tty();
    assert_snapshot!(table.to_string(), @r"
    ╭────────────┬────────────────┬───────────────────────────────────────╮
    │ Input      ┆ Interpretation ┆ rfc3339                               │
    ╞════════════╪════════════════╪═══════════════════════════════════════╡
    │ 1700000000 ┆ epoch          ┆ 2023-11-14T22:13:20.000Z              │
    │ 01/02/23   ┆ delimited_date ┆ 2023-02-01T00:00:00.000Z              │
    │ soon       ┆ -              ┆ error: unrecognised date format: soon │
    ╰────────────┴────────────────┴───────────────────────────────────────╯
    ");
}

// =========================================================================
// Format Lines
// =========================================================================

#[test]
fn test_format_lines_split_failures() {
    let reports = normalize_all(
        &utc(),
        &["15/01/2024", "whenever", "1705276800000"],
        InputMode::Text,
        OutputFormat::Api,
    );
    let (rendered, failures) = render_lines(&reports);
    assert_snapshot!(rendered.join("\n"), @r"
    01/15/2024
    01/15/2024
    ");
    assert_snapshot!(failures.join("\n"), @"error: value 2: unrecognised date format: whenever");
    assert_eq!(
        BatchSummary::from_reports(&reports),
        BatchSummary {
            total: 3,
            failed: 1
        }
    );
}

#[test]
fn test_json_values_render_as_timestamps() {
    let reports = normalize_all(
        &utc(),
        &[r#"{"seconds": 1700000000, "nanoseconds": 123456789}"#, "1700000000"],
        InputMode::Json,
        OutputFormat::Timestamp,
    );
    let (rendered, failures) = render_lines(&reports);
    assert!(failures.is_empty());
    assert_snapshot!(rendered.join("\n"), @r#"
    {"_seconds":1700000000,"_nanoseconds":123000000}
    {"_seconds":1700000000,"_nanoseconds":0}
    "#);
}

#[test]
fn test_offset_changes_ui_day() {
    let normalizer = Normalizer::with_zone("-05:00".parse::<LocalZone>().unwrap());
    let reports = normalize_all(
        &normalizer,
        &["2024-03-05T02:00:00Z"],
        InputMode::Text,
        OutputFormat::Ui,
    );
    assert_eq!(reports[0].outcome.as_deref(), Ok("04/03/2024"));
}
