//! # duckgresql-rs
//!
//! Client driver for DuckGresQL, a remote analytical database. The driver
//! speaks two transports: Flight SQL (a gRPC-carried binary protocol) for
//! interactive queries, and an HTTP/JSON control plane for long-running
//! asynchronous jobs.
//!
//! The protocol machinery is self-contained: the handful of Flight SQL
//! command messages are encoded with a minimal hand-rolled protobuf codec,
//! so no schema compiler or protobuf runtime is required. The RPC transport
//! itself is injected behind the [`transport::FlightSqlTransport`] trait.
//!
//! ## Example
//!
//! ```no_run
//! use duckgresql_rs::{Connection, ConnectionParams, ParameterSet};
//! use duckgresql_rs::transport::FlightSqlTransport;
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio::sync::Mutex;
//!
//! # fn grpc_transport() -> Arc<Mutex<dyn FlightSqlTransport>> { unimplemented!() }
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let params = ConnectionParams::builder()
//!     .token("dkgql_secret")
//!     .database("analytics")
//!     .build()?;
//! let conn = Connection::connect(grpc_transport(), params).await?;
//!
//! // Interactive query with server-side parameter binding
//! let result = conn
//!     .execute_query(
//!         "SELECT * FROM users WHERE age > ?",
//!         Some(ParameterSet::positional([18i64])),
//!     )
//!     .await?;
//! println!("{} rows", result.row_count());
//!
//! // Long-running work goes through the async job path
//! let job = conn.execute_async("COPY big_table TO 's3://bucket'", None).await?;
//! let result = job
//!     .result(Duration::from_secs(300), Duration::from_millis(500))
//!     .await?;
//! println!("{} rows", result.row_count());
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod connection;
pub mod error;
pub mod job;
pub mod query;
pub mod rest;
pub mod transport;
pub mod wire;

// Re-export public API
pub use connection::{Connection, ConnectionParams, ConnectionParamsBuilder};
pub use error::{
    AuthenticationError, ConnectionError, DuckgresqlError, JobError, QueryError, TimeoutError,
    TransportError, WireError,
};
pub use job::{AsyncJob, JobStatus};
pub use query::{ColumnInfo, ParamBatch, Parameter, ParameterSet, ResultSet, StatementKind, Table};
pub use rest::{ControlPlane, RestClient};
pub use transport::{BearerToken, FlightEndpoint, FlightInfo, FlightSqlTransport, Ticket};
