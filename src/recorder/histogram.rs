use crate::events::Event;
use crate::metrics::Histogram;

use super::Recorder;

/// Folds request latencies into a [`Histogram`].
///
/// `TestStart`/`TestEnd` set the measured window; each `RequestEnd` adds its
/// latency, flagged as an error when the request failed. Other events are
/// ignored.
#[derive(Debug)]
pub struct HistogramRecorder {
    histogram: Histogram,
}

impl HistogramRecorder {
    #[must_use]
    pub const fn new(histogram: Histogram) -> Self {
        Self { histogram }
    }

    #[must_use]
    pub const fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    #[must_use]
    pub fn into_histogram(self) -> Histogram {
        self.histogram
    }
}

impl<P, R, E> Recorder<P, R, E> for HistogramRecorder {
    fn record(&mut self, event: &Event<P, R, E>) {
        match event {
            Event::TestStart { time } => self.histogram.start(*time),
            Event::TestEnd { end, .. } => self.histogram.end(*end),
            Event::RequestEnd {
                start, end, outcome, ..
            } => {
                let elapsed = end.saturating_sub(*start);
                if outcome.is_ok() {
                    self.histogram.add(elapsed);
                } else {
                    self.histogram.add_error(elapsed);
                }
            }
            Event::Wait { .. } | Event::RequestStart { .. } => {}
        }
    }
}
