use tokio::sync::broadcast;
use tracing::{info, warn};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;

/// Broadcast channel size for shutdown notifications (single signal fan-out).
const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    broadcast::channel::<()>(SHUTDOWN_CHANNEL_CAPACITY)
}

/// Resolves once shutdown is broadcast. A closed channel never resolves, so a
/// dropped sender does not look like a shutdown request.
pub async fn shutdown_requested(shutdown: &mut ShutdownReceiver) {
    match shutdown.recv().await {
        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
        Err(broadcast::error::RecvError::Closed) => std::future::pending::<()>().await,
    }
}

/// Forwards Ctrl-C (and SIGTERM on unix) into the shutdown channel. The task
/// exits after the first signal or once shutdown was broadcast by someone else.
pub fn setup_signal_shutdown_handler(shutdown_tx: &ShutdownSender) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        let mut shutdown_rx = shutdown_tx.subscribe();

        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                warn!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                () = shutdown_requested(&mut shutdown_rx) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl-C received; finishing in-flight requests.");
                    drop(shutdown_tx.send(()));
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    info!("SIGTERM received; finishing in-flight requests.");
                    drop(shutdown_tx.send(()));
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                () = shutdown_requested(&mut shutdown_rx) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl-C received; finishing in-flight requests.");
                    drop(shutdown_tx.send(()));
                }
            }
        }
    })
}
