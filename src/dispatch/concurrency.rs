use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::clock::unix_nanos;
use crate::events::{Event, ExecutorEvent};
use crate::executor::RequestExecutor;
use crate::request::Request;

use super::execution::InFlight;
use super::gate::WorkerSemaphore;

/// Starts a load test that runs at most as many requests at once as `workers`
/// allows.
///
/// Each request read from `requests` waits for an idle worker, runs on its own
/// task, and hands the worker back when its `RequestEnd` has been sent. No
/// `Wait` events are emitted. If the semaphore is closed the loop stops
/// admitting and drains.
pub fn load_test_concurrency<P, X>(
    workers: WorkerSemaphore,
    mut requests: mpsc::Receiver<Request<P>>,
    executor: Arc<X>,
    events: mpsc::Sender<ExecutorEvent<P, X>>,
) -> JoinHandle<()>
where
    P: Send + Sync + 'static,
    X: RequestExecutor<P>,
{
    tokio::spawn(async move {
        let start = unix_nanos();
        let mut in_flight = InFlight::new(executor, events);
        in_flight.emit(Event::TestStart { time: start }).await;

        while let Some(request) = requests.recv().await {
            let Ok(permit) = workers.acquire().await else {
                warn!("Worker semaphore closed; no further requests admitted.");
                break;
            };
            in_flight.launch(request, Some(permit));
            in_flight.reap();
        }

        debug!("Concurrency dispatch stopped admitting requests");
        in_flight.finish(start).await;
    })
}
