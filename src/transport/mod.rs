//! RPC transport abstraction for Flight SQL communication.
//!
//! The driver's query layer is written against the [`FlightSqlTransport`]
//! trait rather than a concrete client, so the scheduling model and the
//! transport implementation (a gRPC-backed Flight client in production,
//! fakes and mocks in tests) are supplied by the caller.

pub mod protocol;

// Re-export commonly used types
pub use protocol::{BearerToken, FlightEndpoint, FlightInfo, FlightSqlTransport, Ticket};
