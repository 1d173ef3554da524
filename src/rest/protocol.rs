//! Control-plane capability trait and response shapes.

use crate::error::DuckgresqlError;
use crate::job::status::JobStatus;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Status report for one job, as returned by `GET /query/jobs/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusReport {
    /// Current job state
    pub status: JobStatus,
    /// Server-reported error text for failed jobs
    #[serde(default)]
    pub error: Option<String>,
}

/// Result rows for a completed job, as returned by
/// `GET /query/jobs/{id}/result`.
///
/// Rows arrive as objects keyed by column name; the `columns` list fixes
/// the column order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobResultRows {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub results: Vec<serde_json::Map<String, Value>>,
}

/// HTTP control-plane capability.
///
/// One method per endpoint the driver consumes. All methods take the
/// connection token obtained from [`ControlPlane::connect`], so a single
/// client instance can serve any number of connections.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Exchange an API token and database name for a connection token.
    async fn connect(&self, credential: &str, database: &str) -> Result<String, DuckgresqlError>;

    /// Submit a query for asynchronous execution; returns the job id.
    async fn submit_async(
        &self,
        conn_token: &str,
        query: &str,
        bindings: Option<&Value>,
    ) -> Result<String, DuckgresqlError>;

    /// Fetch the current status of a job.
    async fn job_status(
        &self,
        conn_token: &str,
        job_id: &str,
    ) -> Result<JobStatusReport, DuckgresqlError>;

    /// Fetch the result rows of a completed job.
    async fn job_result(
        &self,
        conn_token: &str,
        job_id: &str,
    ) -> Result<JobResultRows, DuckgresqlError>;

    /// Request cancellation of a pending or running job.
    ///
    /// Fire-and-forget: the server acknowledges the request without waiting
    /// for the job to reach the cancelled state.
    async fn cancel_job(&self, conn_token: &str, job_id: &str) -> Result<(), DuckgresqlError>;
}
