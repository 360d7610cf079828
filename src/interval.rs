//! Interval generators for the throughput dispatcher.
//!
//! An interval generator takes the current Unix epoch time in nanoseconds and
//! returns a non-negative wait (also in nanoseconds) until the next request
//! should be sent. The built-in generators ignore the time argument; it is
//! there for generators that model time-dependent traffic, such as the daily
//! load curve of a web site.
use rand::Rng;
use rand::SeedableRng;
use rand::distributions::Open01;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::IntervalError;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Wait used when the target rate is zero. Large enough that the dispatcher
/// effectively idles.
pub const IDLE_INTERVAL: i64 = i64::MAX;

pub trait IntervalGenerator: Send {
    /// Returns the wait in nanoseconds before the next dispatch. Must not
    /// block.
    fn next_interval(&mut self, now_nanos: i64) -> i64;
}

impl<F> IntervalGenerator for F
where
    F: FnMut(i64) -> i64 + Send,
{
    fn next_interval(&mut self, now_nanos: i64) -> i64 {
        self(now_nanos)
    }
}

fn validate_rate(rate: f64) -> Result<f64, IntervalError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(rate)
    } else {
        Err(IntervalError::InvalidRate { rate })
    }
}

/// Emits `1e9 / rate` nanoseconds on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformIntervals {
    interval: i64,
}

impl UniformIntervals {
    /// Creates a generator for `rate` requests per second.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRate` when `rate` is negative, NaN or infinite.
    #[expect(
        clippy::float_arithmetic,
        reason = "Interval is derived from a fractional rate"
    )]
    pub fn new(rate: f64) -> Result<Self, IntervalError> {
        let rate = validate_rate(rate)?;
        let interval = if rate > 0.0 {
            (NANOS_PER_SEC / rate) as i64
        } else {
            IDLE_INTERVAL
        };
        Ok(Self { interval })
    }

    #[must_use]
    pub const fn interval(&self) -> i64 {
        self.interval
    }
}

impl IntervalGenerator for UniformIntervals {
    fn next_interval(&mut self, _now_nanos: i64) -> i64 {
        self.interval
    }
}

/// Emits exponentially distributed intervals, so arrivals form a Poisson
/// process averaging `rate` requests per second.
#[derive(Debug, Clone)]
pub struct ExponentialIntervals<R> {
    rate_per_nano: f64,
    rng: R,
}

impl<R: Rng + Send> ExponentialIntervals<R> {
    /// Creates a generator averaging `rate` requests per second, drawing from
    /// `rng`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRate` when `rate` is negative, NaN or infinite.
    #[expect(
        clippy::float_arithmetic,
        reason = "Exponential lambda is a fractional rate"
    )]
    pub fn new(rate: f64, rng: R) -> Result<Self, IntervalError> {
        let rate = validate_rate(rate)?;
        Ok(Self {
            rate_per_nano: rate / NANOS_PER_SEC,
            rng,
        })
    }
}

impl ExponentialIntervals<StdRng> {
    /// Creates a generator seeded from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRate` when `rate` is negative, NaN or infinite.
    pub fn from_entropy(rate: f64) -> Result<Self, IntervalError> {
        Self::new(rate, StdRng::from_entropy())
    }

    /// Creates a reproducible generator from a fixed seed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRate` when `rate` is negative, NaN or infinite.
    pub fn seeded(rate: f64, seed: u64) -> Result<Self, IntervalError> {
        Self::new(rate, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> IntervalGenerator for ExponentialIntervals<R> {
    #[expect(
        clippy::float_arithmetic,
        reason = "Inverse-transform sampling of the exponential distribution"
    )]
    fn next_interval(&mut self, _now_nanos: i64) -> i64 {
        if self.rate_per_nano <= 0.0 {
            return IDLE_INTERVAL;
        }
        let uniform: f64 = self.rng.sample(Open01);
        let sample = -uniform.ln() / self.rate_per_nano;
        // `as` saturates, so an extreme draw becomes IDLE_INTERVAL.
        sample as i64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IntervalDistribution {
    #[default]
    Uniform,
    Exponential,
}

impl IntervalDistribution {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            IntervalDistribution::Uniform => "uniform",
            IntervalDistribution::Exponential => "exponential",
        }
    }

    /// Builds the generator for this distribution at `rate` requests per
    /// second. `seed` makes the exponential generator reproducible.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRate` when `rate` is negative, NaN or infinite.
    pub fn build(self, rate: f64, seed: Option<u64>) -> Result<ConfiguredIntervals, IntervalError> {
        match self {
            IntervalDistribution::Uniform => {
                UniformIntervals::new(rate).map(ConfiguredIntervals::Uniform)
            }
            IntervalDistribution::Exponential => {
                let generator = match seed {
                    Some(seed) => ExponentialIntervals::seeded(rate, seed)?,
                    None => ExponentialIntervals::from_entropy(rate)?,
                };
                Ok(ConfiguredIntervals::Exponential(Box::new(generator)))
            }
        }
    }
}

/// A generator chosen at runtime from CLI or config.
#[derive(Debug, Clone)]
pub enum ConfiguredIntervals {
    Uniform(UniformIntervals),
    Exponential(Box<ExponentialIntervals<StdRng>>),
}

impl IntervalGenerator for ConfiguredIntervals {
    fn next_interval(&mut self, now_nanos: i64) -> i64 {
        match self {
            ConfiguredIntervals::Uniform(generator) => generator.next_interval(now_nanos),
            ConfiguredIntervals::Exponential(generator) => generator.next_interval(now_nanos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_returns_reciprocal_of_rate() -> Result<(), String> {
        let mut generator = UniformIntervals::new(100.0).map_err(|err| err.to_string())?;
        for now in [0, 42, i64::MAX] {
            let interval = generator.next_interval(now);
            if interval != 10_000_000 {
                return Err(format!("Expected 10ms interval, got {}", interval));
            }
        }
        Ok(())
    }

    #[test]
    fn uniform_zero_rate_idles() -> Result<(), String> {
        let mut generator = UniformIntervals::new(0.0).map_err(|err| err.to_string())?;
        let interval = generator.next_interval(0);
        if interval != IDLE_INTERVAL {
            return Err(format!("Expected idle interval, got {}", interval));
        }
        Ok(())
    }

    #[test]
    fn negative_and_nan_rates_are_rejected() -> Result<(), String> {
        if UniformIntervals::new(-1.0).is_ok() {
            return Err("Expected negative rate to fail".to_owned());
        }
        if ExponentialIntervals::seeded(f64::NAN, 1).is_ok() {
            return Err("Expected NaN rate to fail".to_owned());
        }
        if UniformIntervals::new(f64::INFINITY).is_ok() {
            return Err("Expected infinite rate to fail".to_owned());
        }
        Ok(())
    }

    #[test]
    fn exponential_mean_tracks_rate() -> Result<(), String> {
        let mut generator =
            ExponentialIntervals::seeded(1000.0, 7).map_err(|err| err.to_string())?;
        let samples: i64 = 20_000;
        let mut total: i64 = 0;
        for _ in 0..samples {
            let interval = generator.next_interval(0);
            if interval < 0 {
                return Err(format!("Negative interval {}", interval));
            }
            total = total.saturating_add(interval);
        }
        let mean = total.checked_div(samples).unwrap_or(0);
        // 1000 rps -> 1ms mean; allow 5% sampling error.
        if !(950_000..=1_050_000).contains(&mean) {
            return Err(format!("Unexpected mean interval {}", mean));
        }
        Ok(())
    }

    #[test]
    fn exponential_is_reproducible_with_seed() -> Result<(), String> {
        let mut left = ExponentialIntervals::seeded(50.0, 99).map_err(|err| err.to_string())?;
        let mut right = ExponentialIntervals::seeded(50.0, 99).map_err(|err| err.to_string())?;
        for _ in 0..16 {
            if left.next_interval(0) != right.next_interval(0) {
                return Err("Seeded generators diverged".to_owned());
            }
        }
        Ok(())
    }

    #[test]
    fn exponential_zero_rate_idles() -> Result<(), String> {
        let mut generator = ExponentialIntervals::seeded(0.0, 1).map_err(|err| err.to_string())?;
        if generator.next_interval(0) != IDLE_INTERVAL {
            return Err("Expected idle interval".to_owned());
        }
        Ok(())
    }

    #[test]
    fn closures_are_generators() -> Result<(), String> {
        let mut calls = 0_i64;
        let mut generator = |now: i64| {
            calls = calls.saturating_add(1);
            now.saturating_add(calls)
        };
        let first = generator.next_interval(10);
        let second = generator.next_interval(10);
        if first != 11 || second != 12 {
            return Err(format!("Unexpected closure output {} {}", first, second));
        }
        Ok(())
    }

    #[test]
    fn distribution_builds_configured_generator() -> Result<(), String> {
        let mut generator = IntervalDistribution::Uniform
            .build(4.0, None)
            .map_err(|err| err.to_string())?;
        if generator.next_interval(0) != 250_000_000 {
            return Err("Expected 250ms uniform interval".to_owned());
        }
        let exponential = IntervalDistribution::Exponential
            .build(4.0, Some(3))
            .map_err(|err| err.to_string())?;
        if !matches!(exponential, ConfiguredIntervals::Exponential(_)) {
            return Err("Expected exponential generator".to_owned());
        }
        Ok(())
    }
}
