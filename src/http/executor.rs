use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::error::HttpError;
use crate::executor::RequestExecutor;
use crate::request::Request;

use super::validator::{ResponseValidator, expect_status};

/// One HTTP call to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    fn build(&self, client: &Client) -> Result<reqwest::Request, HttpError> {
        let mut builder = client.request(self.method.clone(), self.url.as_str());
        for (key, value) in &self.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = self.body.as_ref() {
            builder = builder.body(body.clone());
        }
        builder.build().map_err(|source| HttpError::InvalidRequest {
            method: self.method.to_string(),
            url: self.url.clone(),
            source,
        })
    }
}

/// Outcome of a call that produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body_bytes: usize,
}

/// Sends each request with a shared client, reads the full body, and runs the
/// validator over the result.
pub struct HttpExecutor {
    client: Client,
    validator: ResponseValidator,
}

impl HttpExecutor {
    /// Executor that treats any `200 OK` as success.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_validator(client, expect_status(200))
    }

    #[must_use]
    pub const fn with_validator(client: Client, validator: ResponseValidator) -> Self {
        Self { client, validator }
    }
}

#[async_trait]
impl RequestExecutor<HttpRequest> for HttpExecutor {
    type Response = HttpResponse;
    type Error = HttpError;

    async fn execute(
        &self,
        _dispatch_nanos: i64,
        request: &Request<HttpRequest>,
    ) -> Result<HttpResponse, HttpError> {
        let payload = &request.payload;
        let built = payload.build(&self.client)?;
        let response = self
            .client
            .execute(built)
            .await
            .map_err(|source| HttpError::Transport { source })?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|source| HttpError::Body { source })?;

        let summary = HttpResponse {
            status,
            body_bytes: body.len(),
        };
        (self.validator)(payload, &summary, &body)
            .map_err(|message| HttpError::Validation { message })?;
        Ok(summary)
    }
}
