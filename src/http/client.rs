use std::time::Duration;

use reqwest::Client;

pub const DEFAULT_USER_AGENT: &str = concat!("pacer/", env!("CARGO_PKG_VERSION"));

/// Builds the client shared by every in-flight request.
///
/// # Errors
///
/// Returns an error when the TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .build()
}
