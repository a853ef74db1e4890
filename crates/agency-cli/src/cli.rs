//! CLI argument definitions for `agency-dates`.

use std::path::PathBuf;

use agency_datetime::LocalZone;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "agency-dates",
    version,
    about = "Normalize and format dates the way the admin dashboard does",
    long_about = "Normalize dates from form fields, API payloads and stored records.\n\n\
                  Accepts epoch seconds or milliseconds, DD/MM/YYYY text, ISO strings\n\
                  and {_seconds, _nanoseconds} timestamp objects."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with timestamps.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include raw input values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Zone used for local calendar fields: "system", "utc" or an offset
    /// such as "+05:30" (overrides the options file).
    #[arg(long = "utc-offset", value_name = "OFFSET", global = true)]
    pub utc_offset: Option<LocalZone>,

    /// JSON file with normalizer options, e.g. {"local_zone": "+10:00"}.
    #[arg(long = "options", value_name = "PATH", global = true)]
    pub options: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show how each value is interpreted and its canonical value.
    Parse(ParseArgs),

    /// Format values for the UI, the API or storage.
    Format(FormatArgs),
}

#[derive(Args)]
pub struct InputArgs {
    /// Values to normalize (read one per line from stdin when omitted).
    #[arg(value_name = "VALUE")]
    pub values: Vec<String>,

    /// Treat each value as a JSON document (numbers, strings, timestamp objects).
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ParseArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args)]
pub struct FormatArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output representation.
    #[arg(long = "style", value_enum, default_value = "rfc3339")]
    pub style: StyleArg,
}

/// CLI output style choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum StyleArg {
    /// DD/MM/YYYY in the local calendar.
    Ui,
    /// MM/DD/YYYY in UTC.
    Api,
    /// YYYY-MM-DDT00:00:00.000Z from the local calendar date.
    Iso,
    /// {"_seconds", "_nanoseconds"} JSON object.
    Timestamp,
    /// Full RFC 3339 with milliseconds.
    Rfc3339,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
