use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, mpsc};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

use crate::clock::unix_nanos;
use crate::events::{Event, ExecutorEvent};
use crate::executor::RequestExecutor;
use crate::request::Request;

/// Requests admitted by a dispatcher that have not finished yet.
///
/// The join set is the completion barrier: [`InFlight::finish`] waits for every
/// launched request before sending `TestEnd`.
pub(super) struct InFlight<P, X>
where
    P: Send + Sync + 'static,
    X: RequestExecutor<P>,
{
    tasks: JoinSet<()>,
    executor: Arc<X>,
    events: mpsc::Sender<ExecutorEvent<P, X>>,
    launched: u64,
}

impl<P, X> InFlight<P, X>
where
    P: Send + Sync + 'static,
    X: RequestExecutor<P>,
{
    pub(super) fn new(executor: Arc<X>, events: mpsc::Sender<ExecutorEvent<P, X>>) -> Self {
        Self {
            tasks: JoinSet::new(),
            executor,
            events,
            launched: 0,
        }
    }

    /// Sends an event from the dispatch loop. A dropped consumer is ignored so
    /// the load test still drains.
    pub(super) async fn emit(&self, event: ExecutorEvent<P, X>) {
        drop(self.events.send(event).await);
    }

    /// Spawns the request without waiting for it. `permit` is held until the
    /// request's `RequestEnd` has been sent.
    pub(super) fn launch(&mut self, request: Request<P>, permit: Option<OwnedSemaphorePermit>) {
        let executor = Arc::clone(&self.executor);
        let events = self.events.clone();
        let request = Arc::new(request);

        self.tasks.spawn(async move {
            let _permit = permit;
            drop(
                events
                    .send(Event::RequestStart {
                        time: unix_nanos(),
                        request: Arc::clone(&request),
                    })
                    .await,
            );

            let start = unix_nanos();
            let outcome = executor.execute(unix_nanos(), &request).await;
            drop(
                events
                    .send(Event::RequestEnd {
                        start,
                        end: unix_nanos(),
                        request,
                        outcome,
                    })
                    .await,
            );
        });
        self.launched = self.launched.saturating_add(1);
    }

    /// Collects already finished requests so the join set only holds
    /// in-flight work.
    pub(super) fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            log_join_result(result);
        }
    }

    /// Waits for every launched request, then sends `TestEnd`. Dropping `self`
    /// afterwards releases the last sender held by the dispatcher.
    pub(super) async fn finish(mut self, start: i64) {
        debug!(
            "Draining {} in-flight requests ({} launched)",
            self.tasks.len(),
            self.launched
        );
        while let Some(result) = self.tasks.join_next().await {
            log_join_result(result);
        }
        self.emit(Event::TestEnd {
            start,
            end: unix_nanos(),
        })
        .await;
    }
}

fn log_join_result(result: Result<(), JoinError>) {
    if let Err(err) = result {
        error!("Request task failed: {}", err);
    }
}
