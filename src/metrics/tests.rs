use super::*;
use crate::error::HistogramError;

fn histogram(max_bucket: usize, scale: i64) -> Result<Histogram, String> {
    Histogram::new(max_bucket, scale).map_err(|err| err.to_string())
}

fn percentiles(hist: &Histogram, values: &[f64]) -> Result<Vec<usize>, String> {
    hist.percentiles(values).map_err(|err| err.to_string())
}

#[test]
fn single_value_is_min_and_max() -> Result<(), String> {
    let mut hist = histogram(10, 1)?;
    hist.add(5);

    let result = percentiles(&hist, &[0.0, 1.0])?;
    if result != vec![5, 5] {
        return Err(format!("Expected [5, 5], got {:?}", result));
    }
    Ok(())
}

#[test]
fn distinct_values_resolve_to_their_bucket() -> Result<(), String> {
    let mut hist = histogram(100, 1)?;
    for value in 1..=100 {
        hist.add(value);
    }

    let result = percentiles(&hist, &[0.0, 0.01, 0.02, 0.95, 0.99, 1.0])?;
    let expected = vec![1, 1, 2, 95, 99, 100];
    if result != expected {
        return Err(format!("Expected {:?}, got {:?}", expected, result));
    }
    Ok(())
}

#[test]
fn whole_number_ranks_ignore_float_error() -> Result<(), String> {
    let mut hist = histogram(100, 1)?;
    for value in 1..=100 {
        hist.add(value);
    }

    // Each p * 100 is inexact in f64; most land just above the integer.
    let result = percentiles(&hist, &[0.07, 0.14, 0.28, 0.55, 0.57])?;
    let expected = vec![7, 14, 28, 55, 57];
    if result != expected {
        return Err(format!("Expected {:?}, got {:?}", expected, result));
    }

    let between = percentiles(&hist, &[0.071, 0.5501])?;
    if between != vec![8, 56] {
        return Err(format!("Expected fractional ranks to round up, got {:?}", between));
    }
    Ok(())
}

#[test]
fn overlapping_values_share_buckets() -> Result<(), String> {
    let mut hist = histogram(10, 1)?;
    for value in 1..10 {
        hist.add(value);
        hist.add(value);
    }

    let result = percentiles(&hist, &[0.06, 0.07, 0.08, 0.09, 0.1, 0.17])?;
    let expected = vec![1, 1, 1, 1, 1, 2];
    if result != expected {
        return Err(format!("Expected {:?}, got {:?}", expected, result));
    }
    Ok(())
}

#[test]
fn results_follow_argument_order() -> Result<(), String> {
    let mut hist = histogram(100, 1)?;
    for value in 1..=100 {
        hist.add(value);
    }

    let result = percentiles(&hist, &[0.99, 0.01, 0.5])?;
    if result != vec![99, 1, 50] {
        return Err(format!("Expected [99, 1, 50], got {:?}", result));
    }
    Ok(())
}

#[test]
fn values_are_scaled_and_clamped() -> Result<(), String> {
    let mut hist = histogram(10, 1_000)?;
    hist.add(2_999);
    hist.add(1_000_000);
    hist.add(-50);

    if hist.bucket(2) != Some(1) {
        return Err(format!("Expected one sample in bucket 2, got {:?}", hist.bucket(2)));
    }
    if hist.bucket(10) != Some(1) {
        return Err(format!("Expected overflow in bucket 10, got {:?}", hist.bucket(10)));
    }
    if hist.bucket(0) != Some(1) {
        return Err(format!("Expected negative in bucket 0, got {:?}", hist.bucket(0)));
    }
    if hist.bucket(11).is_some() {
        return Err("Expected no bucket past max".to_owned());
    }

    let total: u64 = (0..=hist.max_bucket()).filter_map(|index| hist.bucket(index)).sum();
    if total != hist.count() {
        return Err(format!("Bucket sum {} != count {}", total, hist.count()));
    }
    Ok(())
}

#[test]
fn only_errors_is_full_error_rate() -> Result<(), String> {
    let mut hist = histogram(10, 1)?;
    for _ in 1..10 {
        hist.add_error(1);
    }

    let percent = hist.error_percent().map_err(|err| err.to_string())?;
    if (percent - 100.0).abs() > f64::EPSILON {
        return Err(format!("Expected 100% errors, got {}", percent));
    }
    if hist.count() != 9 || hist.error_count() != 9 {
        return Err(format!(
            "Expected 9 samples and 9 errors, got {} and {}",
            hist.count(),
            hist.error_count()
        ));
    }
    Ok(())
}

#[test]
fn errors_occupy_latency_buckets() -> Result<(), String> {
    let mut hist = histogram(10, 1)?;
    hist.add(2);
    hist.add_error(8);

    let result = percentiles(&hist, &[1.0])?;
    if result != vec![8] {
        return Err(format!("Expected error latency in max, got {:?}", result));
    }
    let average = hist.average().map_err(|err| err.to_string())?;
    if (average - 5.0).abs() > f64::EPSILON {
        return Err(format!("Expected average 5, got {}", average));
    }
    Ok(())
}

#[test]
fn empty_histogram_reports_zero_samples() -> Result<(), String> {
    let hist = histogram(10, 1)?;
    if hist.percentiles(&[0.5]) != Err(HistogramError::ZeroSamples) {
        return Err("Expected ZeroSamples from percentiles".to_owned());
    }
    if hist.average() != Err(HistogramError::ZeroSamples) {
        return Err("Expected ZeroSamples from average".to_owned());
    }
    if hist.error_percent() != Err(HistogramError::ZeroSamples) {
        return Err("Expected ZeroSamples from error_percent".to_owned());
    }
    Ok(())
}

#[test]
fn out_of_range_percentile_is_rejected() -> Result<(), String> {
    let mut hist = histogram(10, 1)?;
    hist.add(1);
    for invalid in [-0.1, 1.5, f64::NAN] {
        match hist.percentiles(&[0.5, invalid]) {
            Err(HistogramError::InvalidPercentile { .. }) => {}
            other => return Err(format!("Expected InvalidPercentile, got {:?}", other)),
        }
    }
    Ok(())
}

#[test]
fn zero_scale_is_rejected() -> Result<(), String> {
    match Histogram::new(10, 0) {
        Err(HistogramError::ZeroScale) => Ok(()),
        other => Err(format!("Expected ZeroScale, got {:?}", other)),
    }
}

#[test]
fn report_summarizes_window() -> Result<(), String> {
    let mut hist = histogram(100, 1_000_000)?;
    hist.start(0);
    for value in 1..=100_i64 {
        hist.add(value.saturating_mul(1_000_000));
    }
    hist.add_error(5_000_000);
    hist.end(2_000_000_000);

    let report = hist.report().map_err(|err| err.to_string())?;
    if report.total_requests != 101 || report.errors != 1 {
        return Err(format!("Unexpected counts {:?}", report));
    }
    if report.min != 1 || report.max != 100 {
        return Err(format!("Unexpected min/max {:?}", report));
    }
    if (report.elapsed_secs - 2.0).abs() > f64::EPSILON {
        return Err(format!("Unexpected elapsed {}", report.elapsed_secs));
    }
    if (report.average_qps - 50.5).abs() > 1e-9 {
        return Err(format!("Unexpected qps {}", report.average_qps));
    }

    let text = report.to_string();
    for needle in ["Percentiles (1ms):", " Max:     100", " Total requests: 101", " Errors: 1"] {
        if !text.contains(needle) {
            return Err(format!("Report missing '{}':\n{}", needle, text));
        }
    }
    Ok(())
}

#[test]
fn report_serializes_to_json() -> Result<(), String> {
    let mut hist = histogram(10, 1)?;
    hist.add(3);
    let report = hist.report().map_err(|err| err.to_string())?;
    let json = serde_json::to_value(&report).map_err(|err| err.to_string())?;
    if json.get("median").and_then(serde_json::Value::as_u64) != Some(3) {
        return Err(format!("Unexpected JSON {}", json));
    }
    Ok(())
}
