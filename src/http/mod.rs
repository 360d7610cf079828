//! `RequestExecutor` over HTTP, backed by a shared `reqwest::Client`.
mod client;
mod executor;
mod validator;


pub use client::{DEFAULT_USER_AGENT, build_client};
pub use executor::{HttpExecutor, HttpRequest, HttpResponse};
pub use validator::{ResponseValidator, expect_status};
