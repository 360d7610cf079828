use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::clock::unix_nanos;
use crate::events::{Event, ExecutorEvent};
use crate::executor::RequestExecutor;
use crate::interval::IntervalGenerator;
use crate::request::Request;

use super::execution::InFlight;

/// Drift compensation for rate-paced dispatch.
///
/// When an iteration of the dispatch loop takes longer than the wait it
/// intended (scheduler jitter, slow spawning, timer granularity), the excess
/// is kept as overage and paid back by shortening later waits. An overage that
/// keeps growing in `Wait` events means the host cannot sustain the target
/// rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacer {
    overage: i64,
}

impl Pacer {
    #[must_use]
    pub const fn new() -> Self {
        Self { overage: 0 }
    }

    /// Shortens `interval` by up to the accumulated overage and returns the
    /// wait to sleep. Neither the wait nor the remaining overage goes below
    /// zero.
    pub fn next_wait(&mut self, interval: i64) -> i64 {
        let wait = interval.max(0);
        let adjust = wait.min(self.overage).max(0);
        self.overage = self.overage.saturating_sub(adjust);
        wait.saturating_sub(adjust)
    }

    /// Adds the time an iteration spent beyond its intended `wait`.
    pub const fn record(&mut self, elapsed: i64, wait: i64) {
        self.overage = self.overage.saturating_add(elapsed.saturating_sub(wait));
    }

    #[must_use]
    pub const fn overage(&self) -> i64 {
        self.overage
    }
}

/// Starts a load test that paces request arrivals with `intervals`.
///
/// Every request read from `requests` is preceded by a `Wait` event and a
/// sleep of the generated interval (minus any overage), then executed on its
/// own task. Concurrency is unbounded: slow or failing responses never slow
/// the arrival rate down.
pub fn load_test_throughput<P, X, G>(
    mut intervals: G,
    mut requests: mpsc::Receiver<Request<P>>,
    executor: Arc<X>,
    events: mpsc::Sender<ExecutorEvent<P, X>>,
) -> JoinHandle<()>
where
    P: Send + Sync + 'static,
    X: RequestExecutor<P>,
    G: IntervalGenerator + 'static,
{
    tokio::spawn(async move {
        let start = unix_nanos();
        let mut in_flight = InFlight::new(executor, events);
        in_flight.emit(Event::TestStart { time: start }).await;

        let mut pacer = Pacer::new();
        while let Some(request) = requests.recv().await {
            let tick = Instant::now();
            let wait = pacer.next_wait(intervals.next_interval(unix_nanos()));
            in_flight
                .emit(Event::Wait {
                    wait,
                    overage: pacer.overage(),
                })
                .await;
            if wait > 0 {
                sleep(Duration::from_nanos(u64::try_from(wait).unwrap_or(0))).await;
            }

            in_flight.launch(request, None);
            in_flight.reap();

            let elapsed = i64::try_from(tick.elapsed().as_nanos()).unwrap_or(i64::MAX);
            pacer.record(elapsed, wait);
        }

        debug!("Request stream closed; overage {} ns", pacer.overage());
        in_flight.finish(start).await;
    })
}
