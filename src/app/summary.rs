use crate::args::OutputFormat;
use crate::error::{AppResult, HistogramError};
use crate::metrics::Histogram;

/// Prints the end-of-run report to stdout.
pub(super) fn print_report(histogram: &Histogram, format: OutputFormat) -> AppResult<()> {
    match histogram.report() {
        Ok(report) => {
            match format {
                OutputFormat::Text => println!("{}", report),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            Ok(())
        }
        Err(HistogramError::ZeroSamples) => {
            println!("No requests completed.");
            Ok(())
        }
        Err(err @ (HistogramError::ZeroScale | HistogramError::InvalidPercentile { .. })) => {
            Err(err.into())
        }
    }
}
