//! Thin wrappers that expose internal parsers to the fuzz targets.
use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::{PositiveU64, PositiveUsize, TesterArgs, parse_duration_arg, parse_header};
use crate::config::apply_config;
use crate::config::types::ConfigFile;
use crate::error::{AppError, AppResult, HistogramError};
use crate::metrics::{Histogram, HistogramReport};

thread_local! {
    static BASE_MATCHES: ArgMatches = TesterArgs::command().get_matches_from(["pacer"]);
}

/// Parses a header string in `Key: Value` format.
///
/// # Errors
///
/// Returns an error when the header is malformed.
pub fn parse_header_input(input: &str) -> AppResult<(String, String)> {
    parse_header(input).map_err(AppError::from)
}

/// Parses a duration argument (e.g. `10s`, `500ms`, `100us`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_arg_input(input: &str) -> AppResult<Duration> {
    parse_duration_arg(input).map_err(AppError::from)
}

/// Parses a positive u64 string value.
///
/// # Errors
///
/// Returns an error when the value is invalid or zero.
pub fn parse_positive_u64_input(input: &str) -> AppResult<u64> {
    let value: PositiveU64 = input.parse()?;
    Ok(value.get())
}

/// Parses a positive usize string value.
///
/// # Errors
///
/// Returns an error when the value is invalid or zero.
pub fn parse_positive_usize_input(input: &str) -> AppResult<usize> {
    let value: PositiveUsize = input.parse()?;
    Ok(value.get())
}

/// Parses TOML config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_toml(input: &str) -> AppResult<()> {
    let config: ConfigFile = toml::from_str(input)?;
    apply_config_to_defaults(config)
}

/// Parses JSON config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_json(input: &[u8]) -> AppResult<()> {
    let config: ConfigFile = serde_json::from_slice(input)?;
    apply_config_to_defaults(config)
}

/// Feeds latency samples (odd values as errors) into a histogram and builds
/// its report.
///
/// # Errors
///
/// Returns an error when `scale_nanos` is not positive or no sample was added.
pub fn histogram_report_input(
    max_bucket: u16,
    scale_nanos: i64,
    samples: &[i64],
) -> Result<HistogramReport, HistogramError> {
    let mut histogram = Histogram::new(usize::from(max_bucket), scale_nanos)?;
    for sample in samples {
        if sample.rem_euclid(2) == 1 {
            histogram.add_error(*sample);
        } else {
            histogram.add(*sample);
        }
    }
    histogram.report()
}

fn apply_config_to_defaults(config: ConfigFile) -> AppResult<()> {
    BASE_MATCHES.with(|matches| {
        let mut args = TesterArgs::from_arg_matches(matches)?;
        apply_config(&mut args, matches, config)
    })
}
