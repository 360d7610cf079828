mod app;
mod config;
mod histogram;
mod http;
mod interval;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use histogram::HistogramError;
pub use http::HttpError;
pub use interval::IntervalError;
pub use validation::ValidationError;
