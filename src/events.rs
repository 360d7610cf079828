//! Lifecycle events emitted by the dispatchers.
use std::fmt;
use std::sync::Arc;

use crate::executor::RequestExecutor;
use crate::request::Request;

/// One step in the lifecycle of a load test. All times are Unix epoch
/// nanoseconds.
///
/// A load test emits exactly one `TestStart` first and exactly one `TestEnd`
/// last, after the `RequestEnd` of every admitted request. Each request emits
/// `RequestStart` before its `RequestEnd`; in throughput mode a `Wait` comes
/// before each `RequestStart`. Events of different requests may interleave in
/// any order.
#[derive(Debug)]
pub enum Event<P, R, E> {
    TestStart {
        time: i64,
    },
    TestEnd {
        start: i64,
        end: i64,
    },
    /// The throughput dispatcher is about to sleep `wait` ns. `overage` is the
    /// pacing debt still left after shortening this wait.
    Wait {
        wait: i64,
        overage: i64,
    },
    /// Sent right before the request is executed. `time` is taken before the
    /// event is sent, so it is earlier than the real start of the call.
    RequestStart {
        time: i64,
        request: Arc<Request<P>>,
    },
    RequestEnd {
        start: i64,
        end: i64,
        request: Arc<Request<P>>,
        outcome: Result<R, E>,
    },
}

/// The event type produced when dispatching `P` payloads to executor `X`.
pub type ExecutorEvent<P, X> =
    Event<P, <X as RequestExecutor<P>>::Response, <X as RequestExecutor<P>>::Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    TestStart,
    TestEnd,
    Wait,
    RequestStart,
    RequestEnd,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::TestStart => "test_start",
            EventKind::TestEnd => "test_end",
            EventKind::Wait => "wait",
            EventKind::RequestStart => "request_start",
            EventKind::RequestEnd => "request_end",
        }
    }
}

impl<P, R, E> Event<P, R, E> {
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Event::TestStart { .. } => EventKind::TestStart,
            Event::TestEnd { .. } => EventKind::TestEnd,
            Event::Wait { .. } => EventKind::Wait,
            Event::RequestStart { .. } => EventKind::RequestStart,
            Event::RequestEnd { .. } => EventKind::RequestEnd,
        }
    }

    /// The request this event belongs to, for `RequestStart`/`RequestEnd`.
    #[must_use]
    pub fn request(&self) -> Option<&Request<P>> {
        match self {
            Event::RequestStart { request, .. } | Event::RequestEnd { request, .. } => {
                Some(request.as_ref())
            }
            Event::TestStart { .. } | Event::TestEnd { .. } | Event::Wait { .. } => None,
        }
    }

    /// Wall-clock latency of a finished request in nanoseconds.
    #[must_use]
    pub const fn elapsed(&self) -> Option<i64> {
        match self {
            Event::RequestEnd { start, end, .. } => Some(end.saturating_sub(*start)),
            Event::TestStart { .. }
            | Event::TestEnd { .. }
            | Event::Wait { .. }
            | Event::RequestStart { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Event::RequestEnd { outcome: Err(_), .. })
    }
}

impl<P, R, E> fmt::Display for Event<P, R, E>
where
    P: fmt::Debug,
    R: fmt::Debug,
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::TestStart { time } => write!(f, "test_start time={}", time),
            Event::TestEnd { start, end } => {
                write!(f, "test_end start={} end={}", start, end)
            }
            Event::Wait { wait, overage } => {
                write!(f, "wait wait={} overage={}", wait, overage)
            }
            Event::RequestStart { time, request } => {
                write!(f, "request_start time={} ", time)?;
                write_request(f, request)
            }
            Event::RequestEnd {
                start,
                end,
                request,
                outcome,
            } => {
                write!(f, "request_end start={} end={} ", start, end)?;
                write_request(f, request)?;
                match outcome {
                    Ok(response) => write!(f, " response={:?}", response),
                    Err(err) => write!(f, " error=\"{}\"", err),
                }
            }
        }
    }
}

fn write_request<P: fmt::Debug>(f: &mut fmt::Formatter<'_>, request: &Request<P>) -> fmt::Result {
    match request.id {
        Some(id) => write!(f, "id={} payload={:?}", id, request.payload),
        None => write!(f, "payload={:?}", request.payload),
    }
}
