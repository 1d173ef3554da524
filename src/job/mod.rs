//! Asynchronous query job lifecycle.
//!
//! Jobs are submitted over the HTTP control plane and polled until they
//! reach a terminal state. The module is organized into:
//! - `status` - the job state machine
//! - `poll` - backoff schedule, suspension strategies and the polling loop
//! - `handle` - the `AsyncJob` handle exposed to callers

pub mod handle;
pub mod poll;
pub mod status;

// Re-export commonly used types
pub use handle::AsyncJob;
pub use poll::{CooperativeSuspend, PollBackoff, Suspend, ThreadSuspend};
pub use poll::{DEFAULT_POLL_INTERVAL, DEFAULT_RESULT_TIMEOUT};
pub use status::JobStatus;
