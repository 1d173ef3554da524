//! Flight SQL command payloads.
//!
//! Every command the driver sends travels as a serialized
//! `google.protobuf.Any` wrapping the actual command message. The Any
//! carries the type URL in field 1 and the encoded inner message in field 2;
//! passing raw SQL bytes instead makes the server reject the descriptor as
//! invalid wire-format data.

use crate::wire::codec;

/// Type URL for a direct statement query.
pub const STATEMENT_QUERY_TYPE_URL: &str =
    "type.googleapis.com/arrow.flight.protocol.sql.CommandStatementQuery";

/// Type URL for a create-prepared-statement action request.
pub const CREATE_PREPARED_TYPE_URL: &str =
    "type.googleapis.com/arrow.flight.protocol.sql.ActionCreatePreparedStatementRequest";

/// Type URL for a prepared-statement query by handle.
pub const PREPARED_QUERY_TYPE_URL: &str =
    "type.googleapis.com/arrow.flight.protocol.sql.CommandPreparedStatementQuery";

/// Type URL for a close-prepared-statement action request.
pub const CLOSE_PREPARED_TYPE_URL: &str =
    "type.googleapis.com/arrow.flight.protocol.sql.ActionClosePreparedStatementRequest";

/// The command messages the server understands.
///
/// Each variant maps to one type URL and one inner message shape. A command
/// is constructed fresh per RPC and never reused after encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Execute a SQL statement directly
    StatementQuery { query: String },
    /// Ask the server to prepare a statement and return a handle
    CreatePreparedStatement { query: String },
    /// Reference a prepared statement by its server-issued handle
    PreparedStatementQuery { handle: Vec<u8> },
    /// Release a prepared statement server-side
    ClosePreparedStatement { handle: Vec<u8> },
}

impl Command {
    /// The `google.protobuf.Any` type URL for this command.
    pub fn type_url(&self) -> &'static str {
        match self {
            Command::StatementQuery { .. } => STATEMENT_QUERY_TYPE_URL,
            Command::CreatePreparedStatement { .. } => CREATE_PREPARED_TYPE_URL,
            Command::PreparedStatementQuery { .. } => PREPARED_QUERY_TYPE_URL,
            Command::ClosePreparedStatement { .. } => CLOSE_PREPARED_TYPE_URL,
        }
    }

    /// Encode the command as a fully-serialized Any envelope.
    ///
    /// Pure and allocation-only; there is no error path because both the
    /// type URL and the inner message are well-formed by construction.
    pub fn encode(&self) -> Vec<u8> {
        let inner = self.encode_inner();
        let mut out = codec::encode_string_field(1, self.type_url());
        out.extend_from_slice(&codec::encode_length_delimited_field(2, &inner));
        out
    }

    /// Encode the inner message: a single field 1 carrying either the SQL
    /// text or the statement handle.
    fn encode_inner(&self) -> Vec<u8> {
        match self {
            Command::StatementQuery { query } | Command::CreatePreparedStatement { query } => {
                codec::encode_string_field(1, query)
            }
            Command::PreparedStatementQuery { handle }
            | Command::ClosePreparedStatement { handle } => {
                codec::encode_length_delimited_field(1, handle)
            }
        }
    }
}
