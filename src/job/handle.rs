//! Handle for a submitted async query job.

use crate::error::{DuckgresqlError, JobError};
use crate::job::poll::{await_job_result, CooperativeSuspend, ThreadSuspend};
use crate::job::status::JobStatus;
use crate::query::results::ResultSet;
use crate::rest::protocol::ControlPlane;
use std::sync::Arc;
use std::time::Duration;

/// Handle for an async query job submitted via the control plane.
///
/// The handle holds only the job id and the shared connection token; all
/// state lives server-side and is observed by polling. Handles are cheap to
/// clone and each `result` call runs its own polling loop with its own
/// backoff schedule.
#[derive(Clone)]
pub struct AsyncJob {
    control: Arc<dyn ControlPlane>,
    conn_token: Arc<str>,
    job_id: String,
}

impl std::fmt::Debug for AsyncJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncJob")
            .field("job_id", &self.job_id)
            .finish()
    }
}

impl AsyncJob {
    pub(crate) fn new(control: Arc<dyn ControlPlane>, conn_token: Arc<str>, job_id: String) -> Self {
        Self {
            control,
            conn_token,
            job_id,
        }
    }

    /// The server-assigned job id.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Poll the server for the current job status.
    pub async fn status(&self) -> Result<JobStatus, DuckgresqlError> {
        let report = self
            .control
            .job_status(&self.conn_token, &self.job_id)
            .await?;
        Ok(report.status)
    }

    /// Check if the job has reached a terminal state.
    pub async fn is_done(&self) -> Result<bool, DuckgresqlError> {
        Ok(self.status().await?.is_terminal())
    }

    /// Await the job result, suspending cooperatively between polls.
    ///
    /// Polls with capped exponential backoff starting from `poll_interval`.
    /// Fails with `JobError` if the job fails or is cancelled, and with
    /// `TimeoutError` once `timeout` elapses; the timeout only abandons the
    /// polling loop, it does not retract the job server-side.
    pub async fn result(
        &self,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<ResultSet, DuckgresqlError> {
        let table = await_job_result(
            self.control.as_ref(),
            &self.conn_token,
            &self.job_id,
            timeout,
            poll_interval,
            &CooperativeSuspend,
        )
        .await?;
        Ok(ResultSet::from_table(table))
    }

    /// Await the job result, blocking the calling thread between polls.
    ///
    /// Same transition logic and deadline math as [`AsyncJob::result`]; only
    /// the suspension differs. Must be called from outside the runtime's
    /// worker threads (a tokio runtime must be reachable for the control
    /// plane calls).
    pub fn result_blocking(
        &self,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<ResultSet, DuckgresqlError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| {
            JobError::InvalidState("blocking wait requires a tokio runtime".to_string())
        })?;
        let table = handle.block_on(await_job_result(
            self.control.as_ref(),
            &self.conn_token,
            &self.job_id,
            timeout,
            poll_interval,
            &ThreadSuspend,
        ))?;
        Ok(ResultSet::from_table(table))
    }

    /// Request cancellation of the job.
    ///
    /// Fire-and-forget: this does not wait for a state transition. Poll
    /// [`AsyncJob::status`] to observe the cancelled state.
    pub async fn cancel(&self) -> Result<(), DuckgresqlError> {
        self.control
            .cancel_job(&self.conn_token, &self.job_id)
            .await
    }
}
