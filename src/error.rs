//! Error types for duckgresql-rs.
//!
//! This module defines domain-specific error types organized by functional
//! area. All errors are reachable through the top-level [`DuckgresqlError`],
//! so callers can match the base type for generic handling or a specific
//! kind for targeted recovery.

use std::time::Duration;
use thiserror::Error;

/// Top-level error type encompassing all possible driver errors.
#[derive(Error, Debug)]
pub enum DuckgresqlError {
    /// Connection establishment or lifecycle errors
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Authentication failures
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    /// Query execution errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Async job errors
    #[error(transparent)]
    Job(#[from] JobError),

    /// Client-side deadline exceeded while awaiting a job
    #[error(transparent)]
    Timeout(#[from] TimeoutError),
}

/// Errors related to establishing and using a connection.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Flight SQL handshake failure
    #[error("Flight SQL handshake failed: {0}")]
    FlightHandshake(String),

    /// REST /connect token exchange failure
    #[error("REST connect failed: {0}")]
    RestConnect(String),

    /// Invalid connection parameters
    #[error("Invalid connection parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Connection is closed
    #[error("Connection is closed")]
    Closed,
}

/// Authentication failure (invalid, expired or revoked credentials).
#[derive(Error, Debug)]
#[error("Authentication failed: {0}")]
pub struct AuthenticationError(pub String);

/// Errors related to query execution over the RPC transport.
#[derive(Error, Debug)]
pub enum QueryError {
    /// RPC transport failure while executing a query
    #[error("Query execution failed: {source}")]
    Transport {
        #[source]
        source: TransportError,
    },

    /// Malformed or unsupported protocol data from the server
    #[error(transparent)]
    Protocol(#[from] WireError),

    /// Query execution failed server-side or returned an unusable result
    #[error("Query execution failed: {0}")]
    ExecutionFailed(String),
}

/// Errors related to async jobs on the HTTP control plane.
#[derive(Error, Debug)]
pub enum JobError {
    /// The server reported the job as failed
    #[error("Job {job_id} failed: {message}")]
    Failed { job_id: String, message: String },

    /// The job was cancelled before completing
    #[error("Job {job_id} was cancelled")]
    Cancelled { job_id: String },

    /// The control plane rejected a request
    #[error("Control plane request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    /// The HTTP request itself could not be performed
    #[error("Control plane transport error: {0}")]
    Transport(String),

    /// The control plane returned a response the driver cannot interpret
    #[error("Malformed control plane response: {0}")]
    InvalidResponse(String),

    /// The job handle was used in a context it does not support
    #[error("Invalid job state: {0}")]
    InvalidState(String),
}

/// Client-side deadline exceeded while awaiting a job result.
#[derive(Error, Debug)]
#[error("Job {job_id} did not complete within {}s", .timeout.as_secs_f64())]
pub struct TimeoutError {
    /// Id of the job that was being awaited
    pub job_id: String,
    /// The configured client-side deadline
    pub timeout: Duration,
}

/// Errors surfaced by an RPC transport implementation.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The server rejected the call as unauthenticated
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// An RPC call failed
    #[error("RPC error: {0}")]
    Rpc(String),

    /// A result stream could not be read
    #[error("Result stream error: {0}")]
    Stream(String),

    /// Network I/O error
    #[error("Network I/O error: {0}")]
    Io(String),
}

/// Wire-format violations while decoding protobuf messages.
///
/// These are protocol violations and never retryable; the query layer
/// surfaces them as [`QueryError::Protocol`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WireError {
    /// The message ended in the middle of a field
    #[error("Truncated message at offset {offset}")]
    TruncatedMessage { offset: usize },

    /// A tag carried a wire type the driver does not understand
    #[error("Unsupported wire type {wire_type}")]
    UnsupportedWireType { wire_type: u8 },

    /// The message decoded but did not carry the expected fields
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for JobError {
    fn from(err: reqwest::Error) -> Self {
        JobError::Transport(err.to_string())
    }
}
