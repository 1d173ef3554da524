//! Decoding of prepared-statement action results.

use crate::error::WireError;
use crate::wire::codec::{decode_message, WireValue};

/// Extract the prepared statement handle from a create-prepared-statement
/// action response.
///
/// The response body is a `google.protobuf.Any` wrapping the result message;
/// the handle is field 1 (bytes) of the inner message. The type URL is not
/// validated, since the server is trusted to answer the action it was asked.
///
/// # Errors
/// Returns [`WireError::MalformedResponse`] if either the Any value field or
/// the handle field is absent after a full scan. This is a protocol
/// violation and not retryable.
pub fn extract_prepared_statement_handle(response: &[u8]) -> Result<Vec<u8>, WireError> {
    let inner = length_delimited_field(response, 2)?.ok_or_else(|| {
        WireError::MalformedResponse("Any envelope has no value field".to_string())
    })?;
    let handle = length_delimited_field(inner, 1)?.ok_or_else(|| {
        WireError::MalformedResponse("prepared statement result has no handle".to_string())
    })?;
    Ok(handle.to_vec())
}

/// Scan `data` for the first length-delimited field with `field_number`.
fn length_delimited_field(data: &[u8], field_number: u32) -> Result<Option<&[u8]>, WireError> {
    for field in decode_message(data)? {
        if field.field_number == field_number {
            if let WireValue::LengthDelimited(payload) = field.value {
                return Ok(Some(payload));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::codec::{encode_length_delimited_field, encode_string_field, encode_varint};
    use crate::wire::command::Command;

    #[test]
    fn test_round_trip_through_command_envelope() {
        // The prepared-statement-query command has exactly the Any{url, {1: handle}}
        // shape the create result uses, so it round-trips through the decoder.
        let handle = b"test-handle".to_vec();
        let encoded = Command::PreparedStatementQuery {
            handle: handle.clone(),
        }
        .encode();
        assert_eq!(extract_prepared_statement_handle(&encoded).unwrap(), handle);
    }

    #[test]
    fn test_round_trip_arbitrary_binary_handle() {
        let handle: Vec<u8> = (0u8..=255).collect();
        let encoded = Command::ClosePreparedStatement {
            handle: handle.clone(),
        }
        .encode();
        assert_eq!(extract_prepared_statement_handle(&encoded).unwrap(), handle);
    }

    #[test]
    fn test_extra_fields_are_skipped() {
        // Inner message: a varint field 3, then the handle in field 1
        let mut inner = encode_varint((3 << 3) | 0);
        inner.extend_from_slice(&encode_varint(99));
        inner.extend_from_slice(&encode_length_delimited_field(1, b"h"));

        let mut body = encode_string_field(1, "ignored.type.url");
        body.extend_from_slice(&encode_length_delimited_field(2, &inner));

        assert_eq!(extract_prepared_statement_handle(&body).unwrap(), b"h");
    }

    #[test]
    fn test_missing_envelope_value_is_malformed() {
        // Only the type URL, no field 2
        let body = encode_string_field(1, "some.type.url");
        let result = extract_prepared_statement_handle(&body);
        assert!(matches!(result, Err(WireError::MalformedResponse(_))));
    }

    #[test]
    fn test_missing_handle_is_malformed() {
        // Envelope is present but the inner message has no field 1
        let inner = encode_length_delimited_field(2, b"not-the-handle");
        let mut body = encode_string_field(1, "some.type.url");
        body.extend_from_slice(&encode_length_delimited_field(2, &inner));

        let result = extract_prepared_statement_handle(&body);
        assert!(matches!(result, Err(WireError::MalformedResponse(_))));
    }

    #[test]
    fn test_truncated_body_propagates_decode_error() {
        let handle = b"abc".to_vec();
        let mut encoded = Command::PreparedStatementQuery { handle }.encode();
        encoded.truncate(encoded.len() - 1);
        let result = extract_prepared_statement_handle(&encoded);
        assert!(matches!(result, Err(WireError::TruncatedMessage { .. })));
    }
}
