use std::time::Duration;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::parsers::ensure_rate;
use crate::args::{PositiveU64, PositiveUsize, TesterArgs, parse_header};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue};

/// Fills in every option the command line left at its default with the value
/// from `config`. Explicit CLI values always win.
///
/// # Errors
///
/// Returns an error when a config value is out of range or malformed.
pub fn apply_config(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(urls) = config.url
    {
        args.url = urls.into_vec();
    }

    if !is_cli(matches, "urls_file")
        && let Some(path) = config.urls_file
    {
        args.urls_file = Some(path);
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method
    {
        args.method = method;
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_deref()
    {
        args.headers = parse_headers(headers)?;
    }

    if !is_cli(matches, "data")
        && let Some(data) = config.data
    {
        args.data = Some(data);
    }

    if !is_cli(matches, "mode")
        && let Some(mode) = config.mode
    {
        args.mode = mode;
    }

    if !is_cli(matches, "rate")
        && let Some(rate) = config.rate
    {
        let rate = ensure_rate(rate)
            .map_err(|err| AppError::config(ConfigError::InvalidRate { source: err }))?;
        args.rate = Some(rate);
    }

    if !is_cli(matches, "distribution")
        && let Some(distribution) = config.distribution
    {
        args.distribution = distribution;
    }

    if !is_cli(matches, "seed")
        && let Some(seed) = config.seed
    {
        args.seed = Some(seed);
    }

    if !is_cli(matches, "workers")
        && let Some(workers) = config.workers
    {
        args.workers = ensure_positive_usize(workers, "workers")?;
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = Some(ensure_positive_u64(requests, "requests")?);
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.duration = Some(to_duration(duration, "duration")?);
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = to_duration(timeout, "timeout")?;
    }

    if !is_cli(matches, "expected_status_code")
        && let Some(status) = config.status
    {
        args.expected_status_code = status;
    }

    if !is_cli(matches, "hist_buckets")
        && let Some(buckets) = config.hist_buckets
    {
        args.hist_buckets = ensure_positive_usize(buckets, "hist_buckets")?;
    }

    if !is_cli(matches, "hist_scale")
        && let Some(scale) = config.hist_scale.as_ref()
    {
        args.hist_scale = to_duration(scale, "hist_scale")?;
    }

    if !is_cli(matches, "event_buffer")
        && let Some(buffer) = config.event_buffer
    {
        args.event_buffer = ensure_positive_usize(buffer, "event_buffer")?;
    }

    if !is_cli(matches, "log_events")
        && let Some(log_events) = config.log_events
    {
        args.log_events = log_events;
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_u64(value: u64, field: &'static str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive { field, source: err })
    })
}

fn ensure_positive_usize(value: usize, field: &'static str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive { field, source: err })
    })
}

fn to_duration(value: &DurationValue, field: &'static str) -> AppResult<Duration> {
    value
        .to_duration()
        .map_err(|err| AppError::config(ConfigError::InvalidDuration { field, source: err }))
}

fn parse_headers(headers: &[String]) -> AppResult<Vec<(String, String)>> {
    let mut parsed = Vec::with_capacity(headers.len());
    for header in headers {
        parsed.push(
            parse_header(header)
                .map_err(|err| AppError::config(ConfigError::InvalidHeader { source: err }))?,
        );
    }
    Ok(parsed)
}
