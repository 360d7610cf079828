use async_trait::async_trait;

use crate::request::Request;

/// Sends one request to the service under test and waits for its response.
///
/// The dispatch core times the whole call, so everything an executor does
/// (connection setup, the protocol round trip, response validation) is
/// charged to the reported latency. Implementations are shared across every
/// in-flight request and must be safe to call concurrently.
#[async_trait]
pub trait RequestExecutor<P>: Send + Sync + 'static
where
    P: Send + Sync + 'static,
{
    type Response: Send + 'static;
    type Error: std::error::Error + Send + 'static;

    /// Executes `request`. `dispatch_nanos` is the Unix epoch time (ns) at
    /// which the dispatcher handed the request over.
    ///
    /// # Errors
    ///
    /// Returns the executor's error when the request fails or its response is
    /// rejected. The error is reported in the `RequestEnd` event and never
    /// stops the load test.
    async fn execute(
        &self,
        dispatch_nanos: i64,
        request: &Request<P>,
    ) -> Result<Self::Response, Self::Error>;
}
