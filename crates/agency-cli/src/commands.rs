use std::io;

use agency_datetime::{Normalizer, OutputFormat};
use anyhow::{Context, Result};
use tracing::{info, info_span};

use agency_cli::config::resolve_options;
use agency_cli::report::{
    BatchSummary, InputMode, ValueReport, build_table, normalize_all, render_lines,
};
use agency_cli::values::collect_values;

use crate::cli::{Cli, FormatArgs, InputArgs, ParseArgs, StyleArg};

/// Builds the normalizer from the options file and `--utc-offset`.
pub fn build_normalizer(cli: &Cli) -> Result<Normalizer> {
    let options = resolve_options(cli.options.as_deref(), cli.utc_offset)?;
    Ok(Normalizer::new(options))
}

pub fn run_parse(args: &ParseArgs, normalizer: &Normalizer) -> Result<BatchSummary> {
    let span = info_span!("parse");
    let _guard = span.enter();
    let reports = normalize_input(&args.input, normalizer, OutputFormat::Rfc3339)?;
    println!("{}", build_table(&reports, OutputFormat::Rfc3339));
    let summary = BatchSummary::from_reports(&reports);
    println!("{summary}");
    Ok(summary)
}

pub fn run_format(args: &FormatArgs, normalizer: &Normalizer) -> Result<BatchSummary> {
    let format = output_format(args.style);
    let span = info_span!("format", style = format.label());
    let _guard = span.enter();
    let reports = normalize_input(&args.input, normalizer, format)?;
    let (rendered, failures) = render_lines(&reports);
    for line in rendered {
        println!("{line}");
    }
    for line in failures {
        eprintln!("{line}");
    }
    let summary = BatchSummary::from_reports(&reports);
    info!(%summary, "format complete");
    Ok(summary)
}

fn normalize_input(
    args: &InputArgs,
    normalizer: &Normalizer,
    format: OutputFormat,
) -> Result<Vec<ValueReport>> {
    let values =
        collect_values(&args.values, io::stdin().lock()).context("collect input values")?;
    let mode = if args.json {
        InputMode::Json
    } else {
        InputMode::Text
    };
    info!(count = values.len(), "normalizing values");
    Ok(normalize_all(normalizer, &values, mode, format))
}

fn output_format(style: StyleArg) -> OutputFormat {
    match style {
        StyleArg::Ui => OutputFormat::Ui,
        StyleArg::Api => OutputFormat::Api,
        StyleArg::Iso => OutputFormat::Iso,
        StyleArg::Timestamp => OutputFormat::Timestamp,
        StyleArg::Rfc3339 => OutputFormat::Rfc3339,
    }
}
