use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::args::DispatchMode;
use crate::dispatch::{WorkerSemaphore, load_test_concurrency, load_test_throughput};
use crate::entry::RunPlan;
use crate::error::{AppResult, HttpError, ValidationError};
use crate::http::{HttpExecutor, HttpRequest, HttpResponse, build_client, expect_status};
use crate::metrics::Histogram;
use crate::recorder::{self, HistogramRecorder, Recorder, TracingRecorder};
use crate::shutdown::{setup_signal_shutdown_handler, shutdown_channel};
use crate::source::RequestSource;

use super::summary;

/// Requests buffered between the source and the dispatcher. Buffered requests
/// are still sent after shutdown, so this stays small.
const SOURCE_BUFFER: usize = 16;

/// Runs one load test against the planned targets and prints its report.
pub(crate) async fn run_local(plan: RunPlan) -> AppResult<()> {
    let RunPlan { args, urls } = plan;
    let target_count = urls.len();

    let client = build_client(args.timeout)?;
    let executor = Arc::new(HttpExecutor::with_validator(
        client,
        expect_status(args.expected_status_code),
    ));
    let payloads: Vec<HttpRequest> = urls
        .into_iter()
        .map(|url| HttpRequest {
            method: args.method.into(),
            url,
            headers: args.headers.clone(),
            body: args.data.clone(),
        })
        .collect();

    let scale_nanos = i64::try_from(args.hist_scale.as_nanos()).unwrap_or(i64::MAX);
    let histogram = Histogram::new(args.hist_buckets.get().saturating_sub(1), scale_nanos)?;

    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let requests = RequestSource::new(payloads)
        .with_limit(args.requests.map(|requests| requests.get()))
        .with_duration(args.duration)
        .with_capacity(SOURCE_BUFFER)
        .spawn(Some(shutdown_tx.subscribe()));
    let (events_tx, events_rx) = mpsc::channel(args.event_buffer.get());

    info!(
        "Starting {} load test ({} targets).",
        args.mode.as_str(),
        target_count
    );
    let dispatcher = match args.mode {
        DispatchMode::Throughput => {
            let rate = args.rate.ok_or(ValidationError::MissingRate)?;
            let intervals = args.distribution.build(rate, args.seed)?;
            info!(
                "Pacing at {} req/s ({} intervals).",
                rate,
                args.distribution.as_str()
            );
            load_test_throughput(intervals, requests, executor, events_tx)
        }
        DispatchMode::Concurrency => {
            info!("Running with {} workers.", args.workers.get());
            let workers = WorkerSemaphore::with_workers(args.workers.get());
            load_test_concurrency(workers, requests, executor, events_tx)
        }
    };

    let mut histogram_recorder = HistogramRecorder::new(histogram);
    let mut tracing_recorder = TracingRecorder;
    let consumed = {
        let mut recorders: Vec<&mut dyn Recorder<HttpRequest, HttpResponse, HttpError>> =
            vec![&mut histogram_recorder];
        if args.log_events {
            recorders.push(&mut tracing_recorder);
        }
        recorder::record(events_rx, &mut recorders).await
    };
    dispatcher.await?;

    drop(shutdown_tx.send(()));
    if let Err(err) = signal_handle.await {
        warn!("Signal handler task failed: {}", err);
    }
    info!("Load test finished ({} events).", consumed);

    summary::print_report(histogram_recorder.histogram(), args.output_format)
}
