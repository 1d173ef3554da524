//! Flight SQL client and the prepared-statement sequence.
//!
//! `FlightSqlClient` drives query execution against an abstract
//! [`FlightSqlTransport`]. Direct statements travel as one command
//! descriptor; parameterized statements run through the prepared-statement
//! sequence, which binds the parameter batch server-side:
//!
//! 1. CreatePreparedStatement action, yielding an opaque handle
//! 2. push the single-row parameter batch tagged with the handle descriptor
//! 3. request result info for the same descriptor
//! 4. pull the result stream, if the info carries an endpoint
//! 5. ClosePreparedStatement action, on every exit path
//!
//! The handle is owned by exactly one in-flight execution and is released
//! exactly once per successful create, even when a later step fails. Close
//! failures never mask the primary outcome; the server eventually reaps
//! abandoned handles.

use crate::error::{AuthenticationError, ConnectionError, DuckgresqlError, QueryError, TransportError};
use crate::query::results::Table;
use crate::query::statement::ParameterSet;
use crate::transport::protocol::{BearerToken, FlightSqlTransport};
use crate::wire::command::Command;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Action name for creating a prepared statement.
const CREATE_PREPARED_STATEMENT_ACTION: &str = "CreatePreparedStatement";
/// Action name for closing a prepared statement.
const CLOSE_PREPARED_STATEMENT_ACTION: &str = "ClosePreparedStatement";

/// Client for executing queries over Flight SQL.
///
/// Holds the transport and the bearer token from the handshake. The token is
/// shared by reference and read-only after authentication, so concurrent
/// executions never copy or mutate it.
pub struct FlightSqlClient {
    /// Transport layer for communication
    transport: Arc<Mutex<dyn FlightSqlTransport>>,
    /// Bearer token from the authentication handshake
    token: Arc<BearerToken>,
}

impl std::fmt::Debug for FlightSqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightSqlClient").finish_non_exhaustive()
    }
}

impl FlightSqlClient {
    /// Authenticate against the server and return a ready client.
    ///
    /// The credential is the API token; the database name rides along as the
    /// second handshake field.
    ///
    /// # Errors
    /// Returns `AuthenticationError` if the server rejects the credentials
    /// and `ConnectionError` for any other handshake failure.
    pub async fn handshake(
        transport: Arc<Mutex<dyn FlightSqlTransport>>,
        credential: &str,
        database: &str,
    ) -> Result<Self, DuckgresqlError> {
        let token = {
            let mut guard = transport.lock().await;
            guard
                .authenticate(credential, database)
                .await
                .map_err(|err| match err {
                    TransportError::Unauthenticated(message) => {
                        DuckgresqlError::from(AuthenticationError(message))
                    }
                    other => ConnectionError::FlightHandshake(other.to_string()).into(),
                })?
        };
        Ok(Self {
            transport,
            token: Arc::new(token),
        })
    }

    /// Execute a read query and return the materialized result.
    ///
    /// Statements with parameters run through the prepared-statement
    /// sequence; plain statements go out as a single command descriptor.
    /// A result info without endpoints yields an empty table.
    pub async fn execute_query(
        &self,
        query: &str,
        parameters: Option<&ParameterSet>,
    ) -> Result<Table, DuckgresqlError> {
        if let Some(parameters) = parameters {
            return self.execute_prepared(query, parameters).await;
        }

        let descriptor = Command::StatementQuery {
            query: query.to_string(),
        }
        .encode();

        let mut transport = self.transport.lock().await;
        let info = transport
            .get_flight_info(&descriptor, &self.token)
            .await
            .map_err(map_rpc_error)?;
        let Some(endpoint) = info.endpoints.into_iter().next() else {
            return Ok(Table::empty());
        };
        transport
            .fetch_stream(&endpoint.ticket, &self.token)
            .await
            .map_err(map_rpc_error)
    }

    /// Execute a DML statement and return the number of affected rows.
    ///
    /// The server answers DML with a single `affected_rows` column carrying
    /// the count; servers that echo rows instead are handled by counting
    /// them (see [`Table::affected_row_count`]).
    pub async fn execute_update(
        &self,
        query: &str,
        parameters: Option<&ParameterSet>,
    ) -> Result<i64, DuckgresqlError> {
        let table = self.execute_query(query, parameters).await?;
        Ok(table.affected_row_count())
    }

    /// Run the prepared-statement sequence for a parameterized query.
    async fn execute_prepared(
        &self,
        query: &str,
        parameters: &ParameterSet,
    ) -> Result<Table, DuckgresqlError> {
        let mut transport = self.transport.lock().await;

        // CREATE: no handle yet, nothing to release on failure
        let request = Command::CreatePreparedStatement {
            query: query.to_string(),
        }
        .encode();
        let responses = transport
            .do_action(CREATE_PREPARED_STATEMENT_ACTION, &request, &self.token)
            .await
            .map_err(map_rpc_error)?;
        let first = responses.into_iter().next().ok_or_else(|| {
            QueryError::ExecutionFailed("CreatePreparedStatement returned no result".to_string())
        })?;
        let handle =
            crate::wire::response::extract_prepared_statement_handle(&first).map_err(QueryError::from)?;

        // BIND through FETCH, with the close guaranteed afterwards
        let outcome = bind_and_fetch(&mut *transport, &self.token, &handle, parameters).await;

        // CLOSE: best-effort, never masks the primary outcome
        let close = Command::ClosePreparedStatement { handle }.encode();
        if let Err(err) = transport
            .do_action(CLOSE_PREPARED_STATEMENT_ACTION, &close, &self.token)
            .await
        {
            debug!(error = %err, "failed to close prepared statement");
        }

        outcome
    }
}

/// Bind the parameter batch, describe the result and fetch it.
async fn bind_and_fetch(
    transport: &mut dyn FlightSqlTransport,
    token: &BearerToken,
    handle: &[u8],
    parameters: &ParameterSet,
) -> Result<Table, DuckgresqlError> {
    let descriptor = Command::PreparedStatementQuery {
        handle: handle.to_vec(),
    }
    .encode();

    let batch = parameters.to_batch();
    transport
        .push_batch(&descriptor, &batch, token)
        .await
        .map_err(map_rpc_error)?;

    let info = transport
        .get_flight_info(&descriptor, token)
        .await
        .map_err(map_rpc_error)?;
    let Some(endpoint) = info.endpoints.into_iter().next() else {
        return Ok(Table::empty());
    };
    transport
        .fetch_stream(&endpoint.ticket, token)
        .await
        .map_err(map_rpc_error)
}

/// Map a transport failure to its domain error.
///
/// Authentication rejections surface as `AuthenticationError`; everything
/// else is wrapped once into `QueryError` with the cause attached.
fn map_rpc_error(err: TransportError) -> DuckgresqlError {
    match err {
        TransportError::Unauthenticated(message) => AuthenticationError(message).into(),
        other => QueryError::Transport { source: other }.into(),
    }
}
