//! Per-value outcomes and their rendering.

use std::fmt;

use agency_datetime::{DateInput, Interpretation, NormalizeError, Normalizer, OutputFormat};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use tracing::{debug, warn};

use crate::logging::redact_value;

/// How raw command-line values are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// The value is date text or a numeric string.
    #[default]
    Text,
    /// The value is a JSON document (number, string or timestamp object).
    Json,
}

/// Outcome of normalizing one value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueReport {
    pub input: String,
    pub interpretation: Option<Interpretation>,
    pub outcome: Result<String, NormalizeError>,
}

impl ValueReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Normalizes one raw value and renders it in `format`.
pub fn normalize_value(
    normalizer: &Normalizer,
    raw: &str,
    mode: InputMode,
    format: OutputFormat,
) -> ValueReport {
    let result = match mode {
        InputMode::Text => normalizer.interpret(raw),
        InputMode::Json => match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(json) => DateInput::from_json(&json).and_then(|input| normalizer.interpret(input)),
            Err(_) => Err(NormalizeError::unrecognised(raw)),
        },
    };
    match result {
        Ok((interpretation, value)) => {
            debug!(
                input = redact_value(raw),
                interpretation = interpretation.label(),
                format = format.label(),
                "value normalized"
            );
            ValueReport {
                input: raw.to_string(),
                interpretation: Some(interpretation),
                outcome: Ok(format.render(normalizer, &value)),
            }
        }
        Err(error) => {
            warn!(input = redact_value(raw), "value could not be normalized");
            ValueReport {
                input: raw.to_string(),
                interpretation: None,
                outcome: Err(error),
            }
        }
    }
}

/// Normalizes every value in order.
pub fn normalize_all<S: AsRef<str>>(
    normalizer: &Normalizer,
    values: &[S],
    mode: InputMode,
    format: OutputFormat,
) -> Vec<ValueReport> {
    values
        .iter()
        .map(|raw| normalize_value(normalizer, raw.as_ref(), mode, format))
        .collect()
}

/// Totals for a batch of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[ValueReport]) -> Self {
        Self {
            total: reports.len(),
            failed: reports.iter().filter(|report| !report.is_ok()).count(),
        }
    }

    pub fn normalized(&self) -> usize {
        self.total - self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} values, {} normalized, {} failed",
            self.total,
            self.normalized(),
            self.failed
        )
    }
}

/// Builds the `parse` table: input, interpretation and rendered value.
pub fn build_table(reports: &[ValueReport], format: OutputFormat) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Interpretation"),
        header_cell(format.label()),
    ]);
    apply_table_style(&mut table);
    for report in reports {
        let interpretation = match report.interpretation {
            Some(interpretation) => Cell::new(interpretation.label()),
            None => dim_cell("-"),
        };
        let outcome = match &report.outcome {
            Ok(rendered) => Cell::new(rendered),
            Err(error) => Cell::new(format!("error: {error}")).fg(Color::Red),
        };
        table.add_row(vec![Cell::new(&report.input), interpretation, outcome]);
    }
    table
}

/// Lines for the `format` command: rendered values on stdout, failures on
/// stderr with their 1-based position.
pub fn render_lines(reports: &[ValueReport]) -> (Vec<String>, Vec<String>) {
    let mut rendered = Vec::new();
    let mut failures = Vec::new();
    for (index, report) in reports.iter().enumerate() {
        match &report.outcome {
            Ok(value) => rendered.push(value.clone()),
            Err(error) => failures.push(format!("error: value {}: {error}", index + 1)),
        }
    }
    (rendered, failures)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agency_datetime::LocalZone;

    fn utc() -> Normalizer {
        Normalizer::with_zone(LocalZone::utc())
    }

    #[test]
    fn test_json_mode_reads_timestamp_objects() {
        let report = normalize_value(
            &utc(),
            r#"{"_seconds":1700000000}"#,
            InputMode::Json,
            OutputFormat::Api,
        );
        assert_eq!(report.interpretation, Some(Interpretation::LegacyTimestamp));
        assert_eq!(report.outcome.as_deref(), Ok("11/14/2023"));
    }

    #[test]
    fn test_invalid_json_is_unrecognised() {
        let report = normalize_value(&utc(), "15/01/2024", InputMode::Json, OutputFormat::Ui);
        assert_eq!(
            report.outcome,
            Err(NormalizeError::unrecognised("15/01/2024"))
        );
    }

    #[test]
    fn test_summary_counts_failures() {
        let reports = normalize_all(
            &utc(),
            &["1700000000", "later", "2024-01-01"],
            InputMode::Text,
            OutputFormat::Iso,
        );
        let summary = BatchSummary::from_reports(&reports);
        assert_eq!(summary.normalized(), 2);
        assert!(summary.has_failures());
        assert_eq!(summary.to_string(), "3 values, 2 normalized, 1 failed");
    }
}
