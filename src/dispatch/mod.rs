//! Admission control and concurrent execution of requests.
//!
//! Two disciplines are provided. [`load_test_throughput`] controls the
//! arrival rate and lets concurrency grow as needed (open loop): it keeps
//! spawning requests even when the service is slow or failing, which is how
//! real traffic behaves and is nearly always the right starting point.
//! [`load_test_concurrency`] controls the number of in-flight requests and
//! lets throughput follow from service latency (closed loop); it suits
//! connection-limit and resource-exhaustion testing, not latency SLOs.
//!
//! Both spawn their dispatch loop on the current Tokio runtime and return its
//! handle. The load test ends when the request channel is closed: admitted
//! requests finish, `TestEnd` is sent, and the event channel closes once every
//! sender is dropped.
mod concurrency;
mod execution;
mod gate;
mod throughput;


pub use concurrency::load_test_concurrency;
pub use gate::WorkerSemaphore;
pub use throughput::{Pacer, load_test_throughput};
