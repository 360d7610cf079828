use super::*;
use crate::dispatch::load_test_throughput;
use crate::events::{Event, EventKind};
use crate::executor::RequestExecutor;
use crate::interval::UniformIntervals;
use crate::metrics::Histogram;
use crate::request::Request;
use async_trait::async_trait;
use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
#[error("fake error")]
struct FakeError;

type TestEvent = Event<u32, u32, FakeError>;

struct EvenFailsExec;

#[async_trait]
impl RequestExecutor<u32> for EvenFailsExec {
    type Response = u32;
    type Error = FakeError;

    async fn execute(&self, _dispatch_nanos: i64, request: &Request<u32>) -> Result<u32, FakeError> {
        if request.payload % 2 == 0 {
            Err(FakeError)
        } else {
            Ok(request.payload)
        }
    }
}

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn sample_events() -> Vec<TestEvent> {
    let first = Arc::new(Request::with_id(1, 10));
    let second = Arc::new(Request::new(20));
    vec![
        Event::TestStart { time: 1_000 },
        Event::Wait {
            wait: 5,
            overage: 0,
        },
        Event::RequestStart {
            time: 1_100,
            request: Arc::clone(&first),
        },
        Event::RequestEnd {
            start: 1_100,
            end: 1_400,
            request: first,
            outcome: Ok(10),
        },
        Event::RequestEnd {
            start: 1_200,
            end: 1_900,
            request: second,
            outcome: Err(FakeError),
        },
        Event::TestEnd {
            start: 1_000,
            end: 2_000,
        },
    ]
}

fn event_channel(events: Vec<TestEvent>) -> Result<mpsc::Receiver<TestEvent>, String> {
    let (tx, rx) = mpsc::channel(events.len().saturating_add(1));
    for event in events {
        tx.try_send(event)
            .map_err(|err| format!("Failed to queue event: {}", err))?;
    }
    Ok(rx)
}

fn histogram_recorder() -> Result<HistogramRecorder, String> {
    Histogram::new(1_000, 1)
        .map(HistogramRecorder::new)
        .map_err(|err| err.to_string())
}

#[test]
fn record_calls_recorders_in_registration_order() -> Result<(), String> {
    run_async_test(async {
        let seen: RefCell<Vec<(u8, EventKind)>> = RefCell::new(Vec::new());
        let mut first = |event: &TestEvent| seen.borrow_mut().push((1, event.kind()));
        let mut second = |event: &TestEvent| seen.borrow_mut().push((2, event.kind()));

        let consumed = {
            let recorders: &mut [&mut dyn Recorder<u32, u32, FakeError>] =
                &mut [&mut first, &mut second];
            record(event_channel(sample_events())?, recorders).await
        };

        if consumed != 6 {
            return Err(format!("Expected 6 events, got {}", consumed));
        }
        let seen = seen.into_inner();
        let expected_kinds = [
            EventKind::TestStart,
            EventKind::Wait,
            EventKind::RequestStart,
            EventKind::RequestEnd,
            EventKind::RequestEnd,
            EventKind::TestEnd,
        ];
        let expected: Vec<(u8, EventKind)> = expected_kinds
            .iter()
            .flat_map(|kind| [(1, *kind), (2, *kind)])
            .collect();
        if seen != expected {
            return Err(format!("Unexpected recorder order {:?}", seen));
        }
        Ok(())
    })
}

#[test]
fn histogram_recorder_tracks_latency_errors_and_window() -> Result<(), String> {
    run_async_test(async {
        let mut histogram = histogram_recorder()?;
        {
            let recorders: &mut [&mut dyn Recorder<u32, u32, FakeError>] = &mut [&mut histogram];
            record(event_channel(sample_events())?, recorders).await;
        }

        let hist = histogram.into_histogram();
        if hist.count() != 2 || hist.error_count() != 1 {
            return Err(format!(
                "Expected 2 samples / 1 error, got {} / {}",
                hist.count(),
                hist.error_count()
            ));
        }
        if hist.bucket(300) != Some(1) || hist.bucket(700) != Some(1) {
            return Err("Expected latencies 300 and 700 to be bucketed".to_owned());
        }
        if hist.elapsed().as_nanos() != 1_000 {
            return Err(format!("Unexpected window {:?}", hist.elapsed()));
        }
        Ok(())
    })
}

#[test]
fn writer_recorder_appends_one_line_per_event() -> Result<(), String> {
    let mut writer = WriterRecorder::new(Vec::new());
    for event in sample_events() {
        Recorder::record(&mut writer, &event);
    }

    let output = String::from_utf8(writer.into_inner()).map_err(|err| err.to_string())?;
    let lines: Vec<&str> = output.lines().collect();
    if lines.len() != 6 {
        return Err(format!("Expected 6 lines, got {}:\n{}", lines.len(), output));
    }
    let expected = [
        (0, "test_start time=1000"),
        (1, "wait wait=5 overage=0"),
        (2, "request_start time=1100 id=1 payload=10"),
        (3, "request_end start=1100 end=1400 id=1 payload=10 response=10"),
        (4, "request_end start=1200 end=1900 payload=20 error=\"fake error\""),
        (5, "test_end start=1000 end=2000"),
    ];
    for (index, line) in expected {
        if lines.get(index) != Some(&line) {
            return Err(format!("Line {} was {:?}, expected {:?}", index, lines.get(index), line));
        }
    }
    Ok(())
}

#[test]
fn tracing_recorder_accepts_every_event() -> Result<(), String> {
    crate::logger::init_logging(false, true);
    let mut recorder = TracingRecorder;
    for event in sample_events() {
        Recorder::record(&mut recorder, &event);
    }
    Ok(())
}

#[test]
fn dispatch_into_histogram_counts_every_request() -> Result<(), String> {
    run_async_test(async {
        let (requests_tx, requests_rx) = mpsc::channel(32);
        for id in 1..=10_u32 {
            requests_tx
                .try_send(Request::with_id(u64::from(id), id))
                .map_err(|err| format!("Failed to queue request: {}", err))?;
        }
        drop(requests_tx);

        let intervals = UniformIntervals::new(100_000.0).map_err(|err| err.to_string())?;
        let (events_tx, events_rx) = mpsc::channel(64);
        let handle = load_test_throughput(intervals, requests_rx, Arc::new(EvenFailsExec), events_tx);

        let mut histogram = histogram_recorder()?;
        let mut kinds = Vec::new();
        let mut collect = |event: &TestEvent| kinds.push(event.kind());
        {
            let recorders: &mut [&mut dyn Recorder<u32, u32, FakeError>] =
                &mut [&mut histogram, &mut collect];
            record(events_rx, recorders).await;
        }
        handle.await.map_err(|err| err.to_string())?;

        let hist = histogram.histogram();
        if hist.count() != 10 || hist.error_count() != 5 {
            return Err(format!(
                "Expected 10 samples / 5 errors, got {} / {}",
                hist.count(),
                hist.error_count()
            ));
        }
        if kinds.last() != Some(&EventKind::TestEnd) {
            return Err(format!("Last event was {:?}", kinds.last()));
        }
        Ok(())
    })
}
