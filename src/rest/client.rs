//! HTTP implementation of the control-plane capability.

use crate::error::{AuthenticationError, ConnectionError, DuckgresqlError, JobError};
use crate::rest::protocol::{ControlPlane, JobResultRows, JobStatusReport};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Default per-request timeout for control-plane calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ConnectResponse {
    connection_token: String,
}

#[derive(Deserialize)]
struct SubmitResponse {
    job_id: String,
}

/// Thin wrapper around `reqwest` for the DuckGresQL REST API.
pub struct RestClient {
    base_url: String,
    http: reqwest::Client,
}

impl RestClient {
    /// Create a client for `base_url` with the default request timeout.
    pub fn new(base_url: &str) -> Result<Self, ConnectionError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client for `base_url` with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ConnectionError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConnectionError::RestConnect(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read the response body and classify non-success statuses.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, DuckgresqlError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_error(status.as_u16(), &body))
    }
}

/// Map a non-success control-plane status to a domain error.
///
/// 401 means the connection token is invalid or expired; any other client
/// or server error carries the server's `{error: {message}}` text when the
/// body provides one, falling back to the raw body.
fn classify_error(status: u16, body: &str) -> DuckgresqlError {
    if status == 401 {
        let message = error_message(body)
            .unwrap_or_else(|| "Connection token invalid or expired".to_string());
        return AuthenticationError(message).into();
    }
    let message = error_message(body).unwrap_or_else(|| body.trim().to_string());
    JobError::RequestFailed { status, message }.into()
}

/// Extract `error.message` from a JSON error body, if present.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl ControlPlane for RestClient {
    async fn connect(&self, credential: &str, database: &str) -> Result<String, DuckgresqlError> {
        let response = self
            .http
            .post(self.url("/connect"))
            .bearer_auth(credential)
            .json(&serde_json::json!({ "database": database }))
            .send()
            .await
            .map_err(|e| ConnectionError::RestConnect(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 {
            let body = response.text().await.unwrap_or_default();
            let message =
                error_message(&body).unwrap_or_else(|| "Authentication failed".to_string());
            return Err(AuthenticationError(message).into());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectionError::RestConnect(format!(
                "status {}: {}",
                status.as_u16(),
                body.trim()
            ))
            .into());
        }

        let parsed: ConnectResponse = response
            .json()
            .await
            .map_err(|e| ConnectionError::RestConnect(e.to_string()))?;
        Ok(parsed.connection_token)
    }

    async fn submit_async(
        &self,
        conn_token: &str,
        query: &str,
        bindings: Option<&Value>,
    ) -> Result<String, DuckgresqlError> {
        let mut payload = serde_json::json!({ "query": query });
        if let Some(bindings) = bindings {
            payload["bindings"] = bindings.clone();
        }

        let response = self
            .http
            .post(self.url("/query/async"))
            .bearer_auth(conn_token)
            .json(&payload)
            .send()
            .await
            .map_err(JobError::from)?;
        let response = Self::check(response).await?;
        let parsed: SubmitResponse = response
            .json()
            .await
            .map_err(|e| JobError::InvalidResponse(e.to_string()))?;
        Ok(parsed.job_id)
    }

    async fn job_status(
        &self,
        conn_token: &str,
        job_id: &str,
    ) -> Result<JobStatusReport, DuckgresqlError> {
        let response = self
            .http
            .get(self.url(&format!("/query/jobs/{job_id}")))
            .bearer_auth(conn_token)
            .send()
            .await
            .map_err(JobError::from)?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| JobError::InvalidResponse(e.to_string()).into())
    }

    async fn job_result(
        &self,
        conn_token: &str,
        job_id: &str,
    ) -> Result<JobResultRows, DuckgresqlError> {
        let response = self
            .http
            .get(self.url(&format!("/query/jobs/{job_id}/result")))
            .bearer_auth(conn_token)
            .send()
            .await
            .map_err(JobError::from)?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| JobError::InvalidResponse(e.to_string()).into())
    }

    async fn cancel_job(&self, conn_token: &str, job_id: &str) -> Result<(), DuckgresqlError> {
        let response = self
            .http
            .post(self.url(&format!("/query/jobs/{job_id}/cancel")))
            .bearer_auth(conn_token)
            .send()
            .await
            .map_err(JobError::from)?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = RestClient::new("http://localhost:3100/").unwrap();
        assert_eq!(client.url("/connect"), "http://localhost:3100/connect");
    }

    #[test]
    fn test_classify_401_with_server_message() {
        let err = classify_error(401, r#"{"error": {"message": "token revoked"}}"#);
        match err {
            DuckgresqlError::Authentication(AuthenticationError(message)) => {
                assert_eq!(message, "token revoked");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_classify_401_without_body() {
        let err = classify_error(401, "");
        assert!(matches!(err, DuckgresqlError::Authentication(_)));
        assert!(err.to_string().contains("invalid or expired"));
    }

    #[test]
    fn test_classify_500_with_server_message() {
        let err = classify_error(500, r#"{"error": {"message": "out of memory"}}"#);
        match err {
            DuckgresqlError::Job(JobError::RequestFailed { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "out of memory");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_classify_falls_back_to_raw_body() {
        let err = classify_error(404, "not found\n");
        match err {
            DuckgresqlError::Job(JobError::RequestFailed { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_error_message_requires_nested_shape() {
        assert_eq!(error_message(r#"{"message": "flat"}"#), None);
        assert_eq!(error_message("not json"), None);
        assert_eq!(
            error_message(r#"{"error": {"message": "nested"}}"#).as_deref(),
            Some("nested")
        );
    }
}
