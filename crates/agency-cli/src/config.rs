//! Normalizer options from an options file and command-line overrides.

use std::fs;
use std::path::Path;

use agency_datetime::{LocalZone, NormalizerOptions};
use anyhow::{Context, Result};
use tracing::info;

/// Reads [`NormalizerOptions`] from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid options JSON.
pub fn load_options(path: &Path) -> Result<NormalizerOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read options file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse options file {}", path.display()))
}

/// Merges the options file (if any) with `--utc-offset`, which wins.
///
/// # Errors
///
/// Returns an error if the options file cannot be loaded.
pub fn resolve_options(
    options_file: Option<&Path>,
    utc_offset: Option<LocalZone>,
) -> Result<NormalizerOptions> {
    let mut options = match options_file {
        Some(path) => load_options(path)?,
        None => NormalizerOptions::default(),
    };
    if let Some(zone) = utc_offset {
        options = options.with_local_zone(zone);
    }
    info!(local_zone = %options.local_zone, "normalizer configured");
    Ok(options)
}
