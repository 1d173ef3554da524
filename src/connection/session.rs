//! Connection to a DuckGresQL server.
//!
//! A connection pairs the Flight SQL client (interactive queries) with the
//! HTTP control plane (async jobs). Both capabilities are injected: the
//! transport always, the control plane optionally (a [`RestClient`] built
//! from the parameters is the default).

use crate::connection::params::ConnectionParams;
use crate::error::{ConnectionError, DuckgresqlError};
use crate::job::handle::AsyncJob;
use crate::query::flight::FlightSqlClient;
use crate::query::results::ResultSet;
use crate::query::statement::{ParameterSet, StatementKind};
use crate::rest::client::RestClient;
use crate::rest::protocol::ControlPlane;
use crate::transport::protocol::FlightSqlTransport;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Connection to a DuckGresQL server.
///
/// # Example
///
/// ```no_run
/// use duckgresql_rs::{Connection, ConnectionParams};
/// use duckgresql_rs::transport::FlightSqlTransport;
/// use std::sync::Arc;
/// use tokio::sync::Mutex;
///
/// # fn grpc_transport() -> Arc<Mutex<dyn FlightSqlTransport>> { unimplemented!() }
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let params = ConnectionParams::builder()
///     .token("dkgql_secret")
///     .database("analytics")
///     .build()?;
/// let mut conn = Connection::connect(grpc_transport(), params).await?;
///
/// let mut result = conn.execute("SELECT * FROM users LIMIT 10", None).await?;
/// for row in result.fetch_all() {
///     println!("{row:?}");
/// }
///
/// conn.close();
/// # Ok(())
/// # }
/// ```
pub struct Connection {
    flight: FlightSqlClient,
    control: Arc<dyn ControlPlane>,
    conn_token: Arc<str>,
    closed: bool,
}

impl Connection {
    /// Connect using the given RPC transport and a REST control plane built
    /// from the parameters.
    ///
    /// Performs the Flight SQL handshake and the REST `/connect` token
    /// exchange; both must succeed for the connection to be usable.
    pub async fn connect(
        transport: Arc<Mutex<dyn FlightSqlTransport>>,
        params: ConnectionParams,
    ) -> Result<Self, DuckgresqlError> {
        let rest = RestClient::with_timeout(&params.rest_base_url(), params.request_timeout)?;
        Self::connect_with_control_plane(transport, Arc::new(rest), params).await
    }

    /// Connect using the given RPC transport and control-plane
    /// implementation.
    pub async fn connect_with_control_plane(
        transport: Arc<Mutex<dyn FlightSqlTransport>>,
        control: Arc<dyn ControlPlane>,
        params: ConnectionParams,
    ) -> Result<Self, DuckgresqlError> {
        let flight = FlightSqlClient::handshake(transport, params.token(), &params.database).await?;
        let conn_token: Arc<str> = control
            .connect(params.token(), &params.database)
            .await?
            .into();
        Ok(Self {
            flight,
            control,
            conn_token,
            closed: false,
        })
    }

    /// Execute a statement, dispatching on its leading keyword.
    ///
    /// Read queries return their rows; DML statements return a result
    /// carrying only the affected-row count.
    pub async fn execute(
        &self,
        sql: &str,
        parameters: Option<ParameterSet>,
    ) -> Result<ResultSet, DuckgresqlError> {
        self.ensure_open()?;
        match StatementKind::from_sql(sql) {
            StatementKind::Read => {
                let table = self.flight.execute_query(sql, parameters.as_ref()).await?;
                Ok(ResultSet::from_table(table))
            }
            StatementKind::Mutation => {
                let affected = self.flight.execute_update(sql, parameters.as_ref()).await?;
                Ok(ResultSet::from_affected_rows(affected))
            }
        }
    }

    /// Execute a read query and return its rows.
    pub async fn execute_query(
        &self,
        sql: &str,
        parameters: Option<ParameterSet>,
    ) -> Result<ResultSet, DuckgresqlError> {
        self.ensure_open()?;
        let table = self.flight.execute_query(sql, parameters.as_ref()).await?;
        Ok(ResultSet::from_table(table))
    }

    /// Execute a DML statement and return the number of affected rows.
    pub async fn execute_update(
        &self,
        sql: &str,
        parameters: Option<ParameterSet>,
    ) -> Result<i64, DuckgresqlError> {
        self.ensure_open()?;
        self.flight.execute_update(sql, parameters.as_ref()).await
    }

    /// Execute a DML statement once per parameter set and return a result
    /// carrying the summed affected-row count.
    pub async fn execute_many<I>(&self, sql: &str, parameter_sets: I) -> Result<ResultSet, DuckgresqlError>
    where
        I: IntoIterator<Item = ParameterSet>,
    {
        self.ensure_open()?;
        let mut total = 0i64;
        for parameters in parameter_sets {
            total += self.flight.execute_update(sql, Some(&parameters)).await?;
        }
        Ok(ResultSet::from_affected_rows(total))
    }

    /// Submit a query for asynchronous execution via the control plane.
    ///
    /// `bindings` is passed through to the server verbatim. The returned
    /// [`AsyncJob`] is polled for status and results.
    pub async fn execute_async(
        &self,
        sql: &str,
        bindings: Option<Value>,
    ) -> Result<AsyncJob, DuckgresqlError> {
        self.ensure_open()?;
        let job_id = self
            .control
            .submit_async(&self.conn_token, sql, bindings.as_ref())
            .await?;
        Ok(AsyncJob::new(
            Arc::clone(&self.control),
            Arc::clone(&self.conn_token),
            job_id,
        ))
    }

    /// Close the connection.
    ///
    /// Idempotent. Closing only prevents new operations; it does not
    /// interrupt in-flight calls or cancel submitted jobs.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Check if the connection has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<(), ConnectionError> {
        if self.closed {
            Err(ConnectionError::Closed)
        } else {
            Ok(())
        }
    }
}
