use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum IntervalError {
    #[error("Rate must be a finite number >= 0, got {rate}.")]
    InvalidRate { rate: f64 },
}
