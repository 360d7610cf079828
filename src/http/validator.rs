use std::sync::Arc;

use super::executor::{HttpRequest, HttpResponse};

/// Decides whether a completed response counts as a success. Receives the
/// request, the response summary and the full body; `Err` carries the reason.
pub type ResponseValidator =
    Arc<dyn Fn(&HttpRequest, &HttpResponse, &[u8]) -> Result<(), String> + Send + Sync>;

/// Accepts only responses with status `code`.
#[must_use]
pub fn expect_status(code: u16) -> ResponseValidator {
    Arc::new(
        move |_request: &HttpRequest, response: &HttpResponse, _body: &[u8]| {
            if response.status == code {
                Ok(())
            } else {
                Err(format!("status {} (expected {})", response.status, code))
            }
        },
    )
}
