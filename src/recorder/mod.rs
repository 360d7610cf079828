//! Consumers of the lifecycle event stream.
mod histogram;
mod log;

#[cfg(test)]
mod tests;

use tokio::sync::mpsc;

use crate::events::Event;

pub use histogram::HistogramRecorder;
pub use log::{TracingRecorder, WriterRecorder};

/// Receives every event of a load test, one at a time.
///
/// Recorders run inline in the consuming loop. One that blocks stalls every
/// other recorder and, once the event channel fills up, the dispatcher too.
pub trait Recorder<P, R, E> {
    fn record(&mut self, event: &Event<P, R, E>);
}

impl<P, R, E, F> Recorder<P, R, E> for F
where
    F: FnMut(&Event<P, R, E>),
{
    fn record(&mut self, event: &Event<P, R, E>) {
        self(event);
    }
}

/// Feeds every event from `events` to each recorder in order, until the
/// channel closes. Returns the number of events consumed.
pub async fn record<P, R, E>(
    mut events: mpsc::Receiver<Event<P, R, E>>,
    recorders: &mut [&mut dyn Recorder<P, R, E>],
) -> u64 {
    let mut consumed: u64 = 0;
    while let Some(event) = events.recv().await {
        for recorder in recorders.iter_mut() {
            recorder.record(&event);
        }
        consumed = consumed.saturating_add(1);
    }
    consumed
}
