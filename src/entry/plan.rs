use std::path::Path;

use clap::ArgMatches;

use crate::args::{DispatchMode, TesterArgs};
use crate::error::{AppError, AppResult, ValidationError};
use crate::interval::IntervalDistribution;

/// Fully validated inputs for one run.
#[derive(Debug)]
pub(crate) struct RunPlan {
    pub(crate) args: TesterArgs,
    /// Targets from `--url` followed by those from `--urls-file`.
    pub(crate) urls: Vec<String>,
}

pub(crate) fn build_plan(mut args: TesterArgs, matches: &ArgMatches) -> AppResult<RunPlan> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, matches, config)?;
    }

    let mut urls = args.url.clone();
    if let Some(path) = args.urls_file.as_deref() {
        urls.extend(read_urls_file(Path::new(path))?);
    }
    validate(&args, &urls)?;

    Ok(RunPlan { args, urls })
}

pub(super) fn validate(args: &TesterArgs, urls: &[String]) -> AppResult<()> {
    if urls.is_empty() {
        return Err(AppError::validation(ValidationError::MissingUrl));
    }
    if args.mode == DispatchMode::Throughput && args.rate.is_none() {
        return Err(AppError::validation(ValidationError::MissingRate));
    }
    if args.seed.is_some() && args.distribution != IntervalDistribution::Exponential {
        return Err(AppError::validation(
            ValidationError::SeedWithoutExponential,
        ));
    }
    Ok(())
}

/// One URL per line; blank lines and `#` comments are skipped.
pub(super) fn read_urls_file(path: &Path) -> AppResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect();
    if urls.is_empty() {
        return Err(AppError::validation(ValidationError::UrlFileEmpty {
            path: path.display().to_string(),
        }));
    }
    Ok(urls)
}
