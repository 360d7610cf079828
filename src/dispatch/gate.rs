use std::sync::Arc;

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Controls how many workers a concurrency load test may run at once.
///
/// The semaphore starts with no workers; call [`WorkerSemaphore::signal`] to
/// add some. It can be resized at any point during a run from any task.
/// Shrinking takes effect as busy workers finish, so there is some lag before
/// the number of in-flight requests drops.
///
/// Removing more workers than were ever added is a caller error: the removal
/// waits forever and the load test stalls. The semaphore does not guard
/// against it.
#[derive(Debug, Clone)]
pub struct WorkerSemaphore {
    permits: Arc<Semaphore>,
}

impl Default for WorkerSemaphore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerSemaphore {
    /// Creates a semaphore with no workers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_workers(0)
    }

    #[must_use]
    pub fn with_workers(workers: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(workers.min(Semaphore::MAX_PERMITS))),
        }
    }

    /// Adds `workers` to the pool.
    pub fn signal(&self, workers: usize) {
        let headroom = Semaphore::MAX_PERMITS.saturating_sub(self.permits.available_permits());
        self.permits.add_permits(workers.min(headroom));
    }

    /// Removes `workers` from the pool, waiting for busy workers to finish
    /// when none are idle.
    ///
    /// # Errors
    ///
    /// Returns an error if the semaphore was closed.
    pub async fn wait(&self, workers: usize) -> Result<(), AcquireError> {
        let count = u32::try_from(workers).unwrap_or(u32::MAX);
        let permits = self.permits.acquire_many(count).await?;
        permits.forget();
        Ok(())
    }

    /// Idle workers right now.
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Stops admitting requests. A running load test drains and ends.
    pub fn close(&self) {
        self.permits.close();
    }

    pub(super) async fn acquire(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        Arc::clone(&self.permits).acquire_owned().await
    }
}
