use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global `tracing` subscriber. `PACER_LOG` takes precedence over
/// `RUST_LOG`; without either, `verbose` selects `debug` over `info` and
/// `log_events` enables the `pacer::events` target.
pub fn init_logging(verbose: bool, log_events: bool) {
    let filter = std::env::var("PACER_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| {
                let base = if verbose { "debug" } else { "info" };
                if log_events {
                    EnvFilter::new(format!("{},pacer::events=debug", base))
                } else {
                    EnvFilter::new(base)
                }
            },
            |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}
