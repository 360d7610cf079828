//! Binary entry point: argument parsing, planning and runtime setup.
mod plan;


use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::TesterArgs;
use crate::config::DEFAULT_CONFIG_FILES;
use crate::error::AppResult;

pub(crate) use plan::RunPlan;
use plan::build_plan;

/// Parses the process arguments, applies the config file, and runs the load
/// test to completion.
///
/// # Errors
///
/// Returns an error for invalid arguments or configuration, or when the
/// runtime or HTTP client cannot be set up. Failed requests are reported, not
/// returned.
pub fn run() -> AppResult<()> {
    let (args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    let plan = build_plan(args, &matches)?;
    crate::logger::init_logging(plan.args.verbose, plan.args.log_events);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(crate::app::run_local(plan))
}

fn parse_args() -> AppResult<Option<(TesterArgs, ArgMatches)>> {
    let mut cmd = TesterArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = TesterArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}
