//! Polling loop, backoff schedule and suspension strategies.
//!
//! The loop is written once against the [`ControlPlane`] call capability and
//! a [`Suspend`] capability, so the parallel-thread and cooperative
//! scheduling models share the same transition logic and deadline math.

use crate::error::{DuckgresqlError, JobError, TimeoutError};
use crate::job::status::JobStatus;
use crate::query::results::Table;
use crate::rest::protocol::ControlPlane;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Default client-side deadline for awaiting a job result.
pub const DEFAULT_RESULT_TIMEOUT: Duration = Duration::from_secs(300);
/// Default initial poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Growth factor applied after every poll.
const BACKOFF_FACTOR: f64 = 1.5;
/// Ceiling on the poll interval.
const BACKOFF_CAP: Duration = Duration::from_secs(5);

/// Capped exponential backoff schedule for job polling.
///
/// Intervals grow by half after every poll and never exceed the 5 second
/// cap, bounding poll frequency under long-running jobs while staying
/// responsive early on.
#[derive(Debug, Clone)]
pub struct PollBackoff {
    interval: Duration,
}

impl PollBackoff {
    /// Start a schedule at `initial`.
    pub fn new(initial: Duration) -> Self {
        Self { interval: initial }
    }

    /// The delay the next suspension will use.
    pub fn current(&self) -> Duration {
        self.interval
    }

    /// Return the delay to wait now and advance the schedule.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.interval;
        self.interval = self.interval.mul_f64(BACKOFF_FACTOR).min(BACKOFF_CAP);
        delay
    }
}

/// How the polling loop waits between status checks.
#[async_trait]
pub trait Suspend: Send + Sync {
    /// Wait for `delay` before the next poll.
    async fn suspend(&self, delay: Duration);
}

/// Cooperative suspension: the task yields to the runtime, letting other
/// tasks proceed on the same worker.
pub struct CooperativeSuspend;

#[async_trait]
impl Suspend for CooperativeSuspend {
    async fn suspend(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Blocking suspension: parks the calling thread for the duration, matching
/// the parallel-thread scheduling model where each in-flight call owns a
/// worker.
pub struct ThreadSuspend;

#[async_trait]
impl Suspend for ThreadSuspend {
    async fn suspend(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Poll a job until it reaches a terminal state and return its result.
///
/// The deadline is captured once at loop entry; a job still non-terminal
/// once the deadline passes fails with [`TimeoutError`] without retracting
/// the job server-side. Failure and cancellation surface as [`JobError`]
/// with the server-reported text attached.
pub(crate) async fn await_job_result(
    control: &dyn ControlPlane,
    conn_token: &str,
    job_id: &str,
    timeout: Duration,
    poll_interval: Duration,
    suspend: &dyn Suspend,
) -> Result<Table, DuckgresqlError> {
    let deadline = Instant::now() + timeout;
    let mut backoff = PollBackoff::new(poll_interval);

    loop {
        let report = control.job_status(conn_token, job_id).await?;
        match report.status {
            JobStatus::Completed => {
                let rows = control.job_result(conn_token, job_id).await?;
                return Ok(Table::from_rest_rows(&rows));
            }
            JobStatus::Failed => {
                return Err(JobError::Failed {
                    job_id: job_id.to_string(),
                    message: report.error.unwrap_or_else(|| "unknown".to_string()),
                }
                .into());
            }
            JobStatus::Cancelled => {
                return Err(JobError::Cancelled {
                    job_id: job_id.to_string(),
                }
                .into());
            }
            JobStatus::Pending | JobStatus::Running => {
                if Instant::now() >= deadline {
                    return Err(TimeoutError {
                        job_id: job_id.to_string(),
                        timeout,
                    }
                    .into());
                }
                let delay = backoff.next_delay();
                trace!(job_id, status = %report.status, ?delay, "job not terminal yet");
                suspend.suspend(delay).await;
            }
        }
    }
}
