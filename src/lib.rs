//! Load generation core for the `pacer` CLI.
//!
//! A load test is a stream of [`request::Request`]s fed to one of two
//! dispatchers. The throughput dispatcher paces arrivals to a target rate
//! (open loop); the concurrency dispatcher keeps a bounded number of requests
//! in flight (closed loop). Both run every request on its own task through a
//! [`executor::RequestExecutor`] and report the run as a stream of
//! [`events::Event`]s, which [`recorder::record`] fans out to recorders such
//! as the latency [`metrics::Histogram`].
//!
//! The `pacer` binary wires these together with an HTTP executor, CLI and
//! config-file handling; see [`entry::run`].
pub mod args;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod events;
pub mod executor;
pub mod http;
pub mod interval;
pub mod logger;
pub mod metrics;
pub mod recorder;
pub mod request;
pub mod shutdown;
pub mod source;

mod app;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
