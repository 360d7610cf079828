use clap::Parser;
use std::time::Duration;

use crate::interval::IntervalDistribution;

use super::parsers::{
    parse_duration_arg, parse_header, parse_positive_u64, parse_positive_usize, parse_rate,
};
use super::types::{DispatchMode, HttpMethod, OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "HTTP load generator with open-loop rate pacing and closed-loop concurrency, reporting a latency histogram.",
    next_help_heading = "Advanced Options"
)]
pub struct TesterArgs {
    /// Target URL (repeatable; requests cycle over all URLs)
    #[arg(long, short, help_heading = "Common Options")]
    pub url: Vec<String>,

    /// Read target URLs from a newline-delimited file
    #[arg(long = "urls-file")]
    pub urls_file: Option<String>,

    /// HTTP method to use
    #[arg(
        long,
        short = 'X',
        default_value = "get",
        ignore_case = true,
        help_heading = "Common Options"
    )]
    pub method: HttpMethod,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header, help_heading = "Common Options")]
    pub headers: Vec<(String, String)>,

    /// Request body
    #[arg(long, short, help_heading = "Common Options")]
    pub data: Option<String>,

    /// Dispatch strategy
    #[arg(
        long,
        default_value = "throughput",
        value_enum,
        help_heading = "Common Options"
    )]
    pub mode: DispatchMode,

    /// Target requests per second (throughput mode)
    #[arg(long, short, value_parser = parse_rate, help_heading = "Common Options")]
    pub rate: Option<f64>,

    /// Inter-request interval distribution (throughput mode)
    #[arg(long, default_value = "uniform", value_enum)]
    pub distribution: IntervalDistribution,

    /// Seed for the exponential distribution, for reproducible schedules
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum requests in flight (concurrency mode)
    #[arg(
        long,
        short = 'c',
        default_value = "10",
        value_parser = parse_positive_usize,
        help_heading = "Common Options"
    )]
    pub workers: PositiveUsize,

    /// Stop after this many requests
    #[arg(long, short = 'n', value_parser = parse_positive_u64, help_heading = "Common Options")]
    pub requests: Option<PositiveU64>,

    /// Stop issuing requests after this long (supports ns/us/ms/s/m/h)
    #[arg(long, short = 't', value_parser = parse_duration_arg, help_heading = "Common Options")]
    pub duration: Option<Duration>,

    /// Per-request timeout (supports ns/us/ms/s/m/h)
    #[arg(long, default_value = "30s", value_parser = parse_duration_arg)]
    pub timeout: Duration,

    /// Expected HTTP status code; anything else counts as an error
    #[arg(long = "status", default_value = "200")]
    pub expected_status_code: u16,

    /// Number of latency buckets; slower requests share the last bucket
    #[arg(long = "hist-buckets", default_value = "10000", value_parser = parse_positive_usize)]
    pub hist_buckets: PositiveUsize,

    /// Width of one latency bucket (supports ns/us/ms/s/m/h)
    #[arg(long = "hist-scale", default_value = "1ms", value_parser = parse_duration_arg)]
    pub hist_scale: Duration,

    /// Capacity of the lifecycle event channel
    #[arg(long = "event-buffer", default_value = "1024", value_parser = parse_positive_usize)]
    pub event_buffer: PositiveUsize,

    /// Log every lifecycle event (target `pacer::events`)
    #[arg(long = "log-events")]
    pub log_events: bool,

    /// Report format
    #[arg(long = "output-format", default_value = "text", value_enum)]
    pub output_format: OutputFormat,

    /// Path to config file (TOML or JSON)
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}
