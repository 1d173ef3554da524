//! Transport protocol abstraction trait.
//!
//! This module defines the `FlightSqlTransport` trait that abstracts the
//! underlying RPC mechanism for talking to a DuckGresQL server. Channel
//! setup, TLS and per-call metadata plumbing live behind the trait; the
//! query layer only sees descriptors, tickets and tables.

use crate::error::TransportError;
use crate::query::results::Table;
use crate::query::statement::ParamBatch;
use async_trait::async_trait;

/// Bearer token returned by the Flight SQL handshake.
///
/// Read-only after authentication; the query layer shares one instance by
/// reference for the life of the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token value.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token value, for attaching to call headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque ticket identifying one result stream on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket(pub Vec<u8>);

/// One location a result stream can be pulled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightEndpoint {
    /// Ticket to pass to [`FlightSqlTransport::fetch_stream`]
    pub ticket: Ticket,
}

/// Result description returned for a command descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightInfo {
    /// Endpoints the result can be fetched from; may be empty for
    /// statements that produce no rows
    pub endpoints: Vec<FlightEndpoint>,
}

/// RPC transport capability for Flight SQL communication.
///
/// Implementations are expected to perform one RPC per method call and to
/// report authentication rejections as [`TransportError::Unauthenticated`]
/// so the query layer can surface them distinctly.
#[async_trait]
pub trait FlightSqlTransport: Send + Sync {
    /// Perform the authentication handshake.
    ///
    /// The credential is the API token and the database name rides along as
    /// the second handshake field; the server answers with a bearer token
    /// that must accompany every subsequent call.
    async fn authenticate(
        &mut self,
        credential: &str,
        database: &str,
    ) -> Result<BearerToken, TransportError>;

    /// Request result info for an encoded command descriptor.
    async fn get_flight_info(
        &mut self,
        descriptor: &[u8],
        token: &BearerToken,
    ) -> Result<FlightInfo, TransportError>;

    /// Pull a result stream and materialize it as a table.
    async fn fetch_stream(
        &mut self,
        ticket: &Ticket,
        token: &BearerToken,
    ) -> Result<Table, TransportError>;

    /// Push a parameter batch tagged with a command descriptor.
    async fn push_batch(
        &mut self,
        descriptor: &[u8],
        batch: &ParamBatch,
        token: &BearerToken,
    ) -> Result<(), TransportError>;

    /// Invoke a named action and collect the response payloads.
    async fn do_action(
        &mut self,
        action: &str,
        body: &[u8],
        token: &BearerToken,
    ) -> Result<Vec<Vec<u8>>, TransportError>;
}
