use std::time::Duration;

use serde::Deserialize;

use crate::args::{DispatchMode, HttpMethod, OutputFormat, parse_duration_arg};
use crate::error::ValidationError;
use crate::interval::IntervalDistribution;

/// Mirror of the CLI options; every field is optional and only fills in
/// values not given on the command line.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(alias = "urls")]
    pub url: Option<UrlList>,
    pub urls_file: Option<String>,
    pub method: Option<HttpMethod>,
    pub headers: Option<Vec<String>>,
    pub data: Option<String>,
    pub mode: Option<DispatchMode>,
    pub rate: Option<f64>,
    pub distribution: Option<IntervalDistribution>,
    pub seed: Option<u64>,
    #[serde(alias = "concurrency")]
    pub workers: Option<usize>,
    pub requests: Option<u64>,
    pub duration: Option<DurationValue>,
    pub timeout: Option<DurationValue>,
    pub status: Option<u16>,
    pub hist_buckets: Option<usize>,
    pub hist_scale: Option<DurationValue>,
    pub event_buffer: Option<usize>,
    pub log_events: Option<bool>,
    pub output_format: Option<OutputFormat>,
}

/// A single URL or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UrlList {
    One(String),
    Many(Vec<String>),
}

impl UrlList {
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            UrlList::One(url) => vec![url],
            UrlList::Many(urls) => urls,
        }
    }
}

/// Whole seconds as a number, or a string with a unit suffix (`"250ms"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
