use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid HTTP method '{value}'.")]
    InvalidMethod { value: String },
    #[error("Missing URL (set --url, --urls-file, or provide urls in config).")]
    MissingUrl,
    #[error("URL file '{path}' contained no URLs.")]
    UrlFileEmpty { path: String },
    #[error("Rate must be a finite number > 0, got '{value}'.")]
    InvalidRate { value: String },
    #[error("Invalid rate '{value}': {source}")]
    InvalidRateNumber {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("Throughput mode requires --rate (or config rate).")]
    MissingRate,
    #[error("--seed only applies to the exponential distribution.")]
    SeedWithoutExponential,
}
