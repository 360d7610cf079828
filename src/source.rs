//! Producers for the request stream consumed by the dispatchers.
//!
//! Closing the stream is how a load test is stopped: the dispatcher stops
//! admitting work, waits for in-flight requests, and emits `TestEnd`.
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use crate::request::Request;
use crate::shutdown::{ShutdownReceiver, shutdown_requested};

/// Feeds `requests` into a bounded channel from a spawned task. The channel
/// closes once the iterator is exhausted or the receiver is dropped.
///
/// Must be called from within a Tokio runtime.
pub fn from_iter<P, I>(requests: I, capacity: usize) -> mpsc::Receiver<Request<P>>
where
    P: Send + 'static,
    I: IntoIterator<Item = Request<P>>,
    I::IntoIter: Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let requests = requests.into_iter();
    tokio::spawn(async move {
        for request in requests {
            if tx.send(request).await.is_err() {
                break;
            }
        }
    });
    rx
}

/// Cycles over a fixed list of payloads, numbering requests from 1, until a
/// count limit, a duration limit or shutdown stops it.
#[derive(Debug, Clone)]
pub struct RequestSource<P> {
    payloads: Vec<P>,
    limit: Option<u64>,
    duration: Option<Duration>,
    capacity: usize,
}

impl<P> RequestSource<P>
where
    P: Clone + Send + 'static,
{
    #[must_use]
    pub const fn new(payloads: Vec<P>) -> Self {
        Self {
            payloads,
            limit: None,
            duration: None,
            capacity: 1,
        }
    }

    /// Stops after `limit` requests.
    #[must_use]
    pub const fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Stops producing once `duration` has passed since [`RequestSource::spawn`].
    #[must_use]
    pub const fn with_duration(mut self, duration: Option<Duration>) -> Self {
        self.duration = duration;
        self
    }

    /// Channel capacity. Requests buffered here are still dispatched after the
    /// source stops, so small values stop a run more promptly.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Starts producing on a spawned task. Must be called from within a Tokio
    /// runtime.
    #[must_use]
    pub fn spawn(self, shutdown: Option<ShutdownReceiver>) -> mpsc::Receiver<Request<P>> {
        let (tx, rx) = mpsc::channel(self.capacity.max(1));
        let deadline = self
            .duration
            .and_then(|duration| Instant::now().checked_add(duration));
        let limit = self.limit;
        let mut payloads = self.payloads.into_iter().cycle();
        let mut shutdown = shutdown;

        tokio::spawn(async move {
            let mut sent: u64 = 0;
            while limit.is_none_or(|limit| sent < limit) {
                let Some(payload) = payloads.next() else {
                    break;
                };
                let request = Request::with_id(sent.saturating_add(1), payload);
                tokio::select! {
                    biased;
                    () = stop_on_shutdown(shutdown.as_mut()) => {
                        debug!("Request source stopped by shutdown.");
                        break;
                    }
                    () = stop_at(deadline) => {
                        debug!("Request source reached its duration limit.");
                        break;
                    }
                    result = tx.send(request) => {
                        if result.is_err() {
                            break;
                        }
                    }
                }
                sent = sent.saturating_add(1);
            }
            debug!("Request source closed after {} requests.", sent);
        });
        rx
    }
}

async fn stop_on_shutdown(shutdown: Option<&mut ShutdownReceiver>) {
    match shutdown {
        Some(receiver) => shutdown_requested(receiver).await,
        None => std::future::pending::<()>().await,
    }
}

async fn stop_at(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
