//! Minimal protobuf wire format for Flight SQL commands.
//!
//! The server's RPC layer only requires a handful of fixed message shapes,
//! so this module encodes and decodes them by hand instead of depending on
//! a protobuf runtime and code generation.
//!
//! The module is organized into:
//! - `codec` - varints, tags and field encoding/decoding primitives
//! - `command` - the four Flight SQL command payloads, Any-enveloped
//! - `response` - prepared statement result decoding

pub mod codec;
pub mod command;
pub mod response;

// Re-export commonly used items
pub use codec::{decode_message, decode_varint, encode_varint, WireField, WireValue};
pub use command::Command;
pub use response::extract_prepared_statement_handle;
