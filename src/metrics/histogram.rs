use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::HistogramError;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Relative distance from an integer under which `p * n` counts as that
/// integer. Covers products such as `0.07 * 100 = 7.000000000000001`.
const RANK_TOLERANCE: f64 = 1e-9;

/// Percentiles shown in the summary report, in display order.
const REPORT_PERCENTILES: [f64; 8] = [0.0, 0.5, 0.9, 0.95, 0.99, 0.999, 0.9999, 1.0];

/// Fixed-capacity latency histogram.
///
/// Values (nanoseconds) are divided by `scale` and counted in one of
/// `max_bucket + 1` buckets; anything at or beyond `max_bucket` lands in the
/// last bucket. Memory use is fixed at construction, insertion is O(1), and
/// extracting k percentiles is a single O(buckets) scan.
///
/// Failed requests are counted in their latency bucket and also flagged in the
/// error counter, so they contribute to throughput and latency as well as to
/// the error rate.
#[derive(Debug, Clone)]
pub struct Histogram {
    start: i64,
    end: i64,
    scale: i64,
    n: u64,
    errors: u64,
    total: i128,
    buckets: Vec<u64>,
}

impl Histogram {
    /// Creates an empty histogram with buckets `0..=max_bucket`, each `scale_nanos`
    /// wide.
    ///
    /// # Errors
    ///
    /// Returns `ZeroScale` when `scale_nanos` is not positive.
    pub fn new(max_bucket: usize, scale_nanos: i64) -> Result<Self, HistogramError> {
        if scale_nanos <= 0 {
            return Err(HistogramError::ZeroScale);
        }
        Ok(Self {
            start: 0,
            end: 0,
            scale: scale_nanos,
            n: 0,
            errors: 0,
            total: 0,
            buckets: vec![0; max_bucket.saturating_add(1)],
        })
    }

    /// Records the wall-clock start of the measured window.
    pub const fn start(&mut self, time: i64) {
        self.start = time;
    }

    /// Records the wall-clock end of the measured window.
    pub const fn end(&mut self, time: i64) {
        self.end = time;
    }

    /// Adds a successful sample.
    pub fn add(&mut self, value: i64) {
        let scaled = value.checked_div(self.scale).unwrap_or(0).max(0);
        let index = usize::try_from(scaled)
            .unwrap_or(usize::MAX)
            .min(self.max_bucket());
        if let Some(bucket) = self.buckets.get_mut(index) {
            *bucket = bucket.saturating_add(1);
        }
        self.n = self.n.saturating_add(1);
        self.total = self.total.saturating_add(i128::from(scaled));
    }

    /// Adds a failed sample: bucketed like [`Histogram::add`] and counted as an
    /// error.
    pub fn add_error(&mut self, value: i64) {
        self.add(value);
        self.errors = self.errors.saturating_add(1);
    }

    /// Resolves each percentile in `percentiles` (each within `[0.0, 1.0]`) to
    /// the smallest bucket whose cumulative count reaches `max(1, ceil(p * n))`.
    /// Results are returned in the same order as the arguments.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPercentile` for a value outside `[0.0, 1.0]` (or NaN),
    /// and `ZeroSamples` when nothing has been added yet.
    pub fn percentiles(&self, percentiles: &[f64]) -> Result<Vec<usize>, HistogramError> {
        if let Some(invalid) = percentiles
            .iter()
            .find(|value| !(0.0..=1.0).contains(*value))
        {
            return Err(HistogramError::InvalidPercentile { value: *invalid });
        }
        if self.n == 0 {
            return Err(HistogramError::ZeroSamples);
        }

        let mut pending: Vec<(usize, u64)> = percentiles
            .iter()
            .enumerate()
            .map(|(slot, percentile)| (slot, self.rank(*percentile)))
            .collect();
        pending.sort_unstable_by_key(|(_, rank)| *rank);

        let mut result = vec![0; percentiles.len()];
        let mut pending = pending.into_iter().peekable();
        let mut accum: u64 = 0;
        for (bucket, count) in self.buckets.iter().enumerate() {
            accum = accum.saturating_add(*count);
            while let Some((slot, _)) = pending.next_if(|(_, rank)| *rank <= accum) {
                if let Some(out) = result.get_mut(slot) {
                    *out = bucket;
                }
            }
            if pending.peek().is_none() {
                break;
            }
        }
        Ok(result)
    }

    /// Mean of the scaled samples.
    ///
    /// # Errors
    ///
    /// Returns `ZeroSamples` when the histogram is empty.
    #[expect(clippy::float_arithmetic, reason = "Average is fractional")]
    pub fn average(&self) -> Result<f64, HistogramError> {
        if self.n == 0 {
            return Err(HistogramError::ZeroSamples);
        }
        Ok(self.total as f64 / self.n as f64)
    }

    /// Percentage (0-100) of samples that were errors.
    ///
    /// # Errors
    ///
    /// Returns `ZeroSamples` when the histogram is empty.
    #[expect(clippy::float_arithmetic, reason = "Error rate is fractional")]
    pub fn error_percent(&self) -> Result<f64, HistogramError> {
        if self.n == 0 {
            return Err(HistogramError::ZeroSamples);
        }
        Ok(self.errors as f64 / self.n as f64 * 100.0)
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.n
    }

    #[must_use]
    pub const fn error_count(&self) -> u64 {
        self.errors
    }

    /// Bucket width in nanoseconds.
    #[must_use]
    pub const fn scale(&self) -> i64 {
        self.scale
    }

    #[must_use]
    pub fn max_bucket(&self) -> usize {
        self.buckets.len().saturating_sub(1)
    }

    /// Count in a single bucket, `None` past `max_bucket`.
    #[must_use]
    pub fn bucket(&self, index: usize) -> Option<u64> {
        self.buckets.get(index).copied()
    }

    /// Length of the window recorded by `start`/`end`.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        let nanos = self.end.saturating_sub(self.start).max(0);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(0))
    }

    /// Builds the end-of-run summary.
    ///
    /// # Errors
    ///
    /// Returns `ZeroSamples` when the histogram is empty.
    #[expect(clippy::float_arithmetic, reason = "Throughput is fractional")]
    pub fn report(&self) -> Result<HistogramReport, HistogramError> {
        let values = self.percentiles(&REPORT_PERCENTILES)?;
        let value_at = |slot: usize| values.get(slot).copied().unwrap_or(0);
        let elapsed_secs = self.end.saturating_sub(self.start).max(0) as f64 / NANOS_PER_SEC;
        let average_qps = if elapsed_secs > 0.0 {
            self.n as f64 / elapsed_secs
        } else {
            0.0
        };

        Ok(HistogramReport {
            scale_nanos: self.scale,
            min: value_at(0),
            median: value_at(1),
            p90: value_at(2),
            p95: value_at(3),
            p99: value_at(4),
            p999: value_at(5),
            p9999: value_at(6),
            max: value_at(7),
            average: self.average()?,
            total_requests: self.n,
            elapsed_secs,
            average_qps,
            errors: self.errors,
            error_percent: self.error_percent()?,
        })
    }

    #[expect(clippy::float_arithmetic, reason = "Rank is a fraction of the sample count")]
    fn rank(&self, percentile: f64) -> u64 {
        let exact = percentile * self.n as f64;
        let nearest = exact.round();
        let rank = if (exact - nearest).abs() <= RANK_TOLERANCE * nearest.max(1.0) {
            nearest
        } else {
            exact.ceil()
        };
        (rank as u64).clamp(1, self.n.max(1))
    }
}

/// Summary of a finished load test. Percentile and average values are in
/// bucket units (multiples of `scale_nanos`).
#[derive(Debug, Clone, Serialize)]
pub struct HistogramReport {
    pub scale_nanos: i64,
    pub min: usize,
    pub median: usize,
    pub p90: usize,
    pub p95: usize,
    pub p99: usize,
    pub p999: usize,
    pub p9999: usize,
    pub max: usize,
    pub average: f64,
    pub total_requests: u64,
    pub elapsed_secs: f64,
    pub average_qps: f64,
    pub errors: u64,
    pub error_percent: f64,
}

impl fmt::Display for HistogramReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = Duration::from_nanos(u64::try_from(self.scale_nanos).unwrap_or(0));
        writeln!(f, "Percentiles ({:?}):", scale)?;
        writeln!(f, " Min:     {}", self.min)?;
        writeln!(f, " Median:  {}", self.median)?;
        writeln!(f, " 90th:    {}", self.p90)?;
        writeln!(f, " 95th:    {}", self.p95)?;
        writeln!(f, " 99th:    {}", self.p99)?;
        writeln!(f, " 99.9th:  {}", self.p999)?;
        writeln!(f, " 99.99th: {}", self.p9999)?;
        writeln!(f, " Max:     {}", self.max)?;
        writeln!(f, "Stats:")?;
        writeln!(f, " Average ({:?}): {:.6}", scale, self.average)?;
        writeln!(f, " Total requests: {}", self.total_requests)?;
        writeln!(f, " Elapsed Time (sec): {:.4}", self.elapsed_secs)?;
        writeln!(f, " Average QPS: {:.2}", self.average_qps)?;
        writeln!(f, " Errors: {}", self.errors)?;
        write!(f, " Percent errors: {:.2}", self.error_percent)
    }
}
