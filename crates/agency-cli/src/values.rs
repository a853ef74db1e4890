//! Raw values from the command line or a line-oriented reader.

use std::io::BufRead;

use anyhow::{Context, Result, bail};

/// Non-blank lines from `reader`, untrimmed.
///
/// # Errors
///
/// Returns an error if reading fails.
pub fn read_values<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut values = Vec::new();
    for line in reader.lines() {
        let line = line.context("read value line")?;
        if !line.trim().is_empty() {
            values.push(line);
        }
    }
    Ok(values)
}

/// The given values, or the lines of `reader` when none were given.
///
/// # Errors
///
/// Returns an error if reading fails or there is nothing to normalize.
pub fn collect_values<R: BufRead>(given: &[String], reader: R) -> Result<Vec<String>> {
    let values = if given.is_empty() {
        read_values(reader)?
    } else {
        given.to_vec()
    };
    if values.is_empty() {
        bail!("no values given");
    }
    Ok(values)
}
