/// A request handed to a dispatcher.
///
/// The payload is opaque to the dispatch core: it is only forwarded to the
/// [`RequestExecutor`](crate::executor::RequestExecutor) and echoed back in
/// lifecycle events. The optional id lets consumers correlate events without
/// inspecting the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<P> {
    pub id: Option<u64>,
    pub payload: P,
}

impl<P> Request<P> {
    #[must_use]
    pub const fn new(payload: P) -> Self {
        Self { id: None, payload }
    }

    #[must_use]
    pub const fn with_id(id: u64, payload: P) -> Self {
        Self {
            id: Some(id),
            payload,
        }
    }
}
