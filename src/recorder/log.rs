use std::fmt;
use std::io::Write;

use tracing::{debug, warn};

use crate::events::Event;

use super::Recorder;

/// Logs every event through `tracing` under the `pacer::events` target.
/// Failed requests are logged at WARN, everything else at DEBUG.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRecorder;

impl<P, R, E> Recorder<P, R, E> for TracingRecorder
where
    P: fmt::Debug,
    R: fmt::Debug,
    E: fmt::Display,
{
    fn record(&mut self, event: &Event<P, R, E>) {
        if event.is_error() {
            warn!(target: "pacer::events", "{}", event);
        } else {
            debug!(target: "pacer::events", "{}", event);
        }
    }
}

/// Appends one line per event to a writer.
///
/// Write errors are logged once and further output is dropped; a broken log
/// never stops the recorder pipeline.
#[derive(Debug)]
pub struct WriterRecorder<W> {
    writer: W,
    failed: bool,
}

impl<W: Write> WriterRecorder<W> {
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<P, R, E, W> Recorder<P, R, E> for WriterRecorder<W>
where
    P: fmt::Debug,
    R: fmt::Debug,
    E: fmt::Display,
    W: Write,
{
    fn record(&mut self, event: &Event<P, R, E>) {
        if self.failed {
            return;
        }
        if let Err(err) = writeln!(self.writer, "{}", event) {
            warn!("Event log write failed; disabling event log: {}", err);
            self.failed = true;
        }
    }
}
