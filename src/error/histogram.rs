use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum HistogramError {
    #[error("Histogram scale must be > 0 ns.")]
    ZeroScale,
    #[error("Percentile {value} is outside [0.0, 1.0].")]
    InvalidPercentile { value: f64 },
    #[error("Histogram has no samples.")]
    ZeroSamples,
}
