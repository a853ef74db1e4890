//! Library components for the `agency-dates` command.

pub mod config;
pub mod logging;
pub mod report;
pub mod values;
