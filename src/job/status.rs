//! Job status state machine.

use serde::Deserialize;
use std::fmt;

/// Status of an async query job.
///
/// The server drives the transitions; the client only observes them by
/// polling. `Pending` and `Running` are the non-terminal states; a job that
/// reaches `Completed`, `Failed` or `Cancelled` never leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted but not yet running
    Pending,
    /// Currently executing
    Running,
    /// Finished successfully; the result can be fetched
    Completed,
    /// Finished with a server-reported error
    Failed,
    /// Cancelled before completing
    Cancelled,
}

impl JobStatus {
    /// Check if the job has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        };
        write!(f, "{name}")
    }
}
