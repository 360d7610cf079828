//! Bounded-memory latency histogram and the end-of-run report.
mod histogram;

#[cfg(test)]
mod tests;

pub use histogram::{Histogram, HistogramReport};
