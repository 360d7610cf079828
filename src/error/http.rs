use thiserror::Error;

/// Failure of a single HTTP request. Carried in `RequestEnd` events, never
/// propagated to the dispatch loop.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid request '{method} {url}': {source}")]
    InvalidRequest {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Transport error: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response body: {source}")]
    Body {
        #[source]
        source: reqwest::Error,
    },
    #[error("Response rejected: {message}")]
    Validation { message: String },
}
