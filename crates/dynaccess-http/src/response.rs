//! Response decoding: checksum verification and error parsing.
//!
//! Error bodies follow the JSON protocol:
//!
//! ```json
//! {
//!   "__type": "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException",
//!   "Message": "Requested resource not found"
//! }
//! ```

use serde_json::Value;

use dynaccess_model::error::{DynamoDBError, DynamoDBErrorCode};

/// Header carrying the CRC32 of the response body.
pub const CRC32_HEADER: &str = "x-amz-crc32";

/// Decodes a raw response into its JSON document or a typed error.
pub fn parse_response(
    status: http::StatusCode,
    headers: &http::HeaderMap,
    body: &[u8],
) -> Result<Value, DynamoDBError> {
    verify_crc32(headers, body)?;

    let document: Value = if body.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(body).map_err(|e| {
            DynamoDBError::serialization_exception(format!("invalid response body: {e}"))
                .with_status(status)
        })?
    };

    if status.is_success() {
        return Ok(document);
    }
    Err(parse_error(status, &document))
}

/// Builds the error for a non-success response document.
#[must_use]
pub fn parse_error(status: http::StatusCode, document: &Value) -> DynamoDBError {
    let code = document
        .get("__type")
        .and_then(Value::as_str)
        .map_or(DynamoDBErrorCode::Unknown, DynamoDBErrorCode::from_type);
    let message = document
        .get("message")
        .or_else(|| document.get("Message"))
        .and_then(Value::as_str)
        .map_or_else(|| code.as_str().to_owned(), ToOwned::to_owned);

    DynamoDBError::with_message(code, message).with_status(status)
}

fn verify_crc32(headers: &http::HeaderMap, body: &[u8]) -> Result<(), DynamoDBError> {
    let Some(expected) = headers.get(CRC32_HEADER) else {
        return Ok(());
    };
    let expected: u32 = expected
        .to_str()
        .ok()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| DynamoDBError::internal_error("malformed x-amz-crc32 header"))?;
    let actual = crc32fast::hash(body);
    if actual != expected {
        return Err(DynamoDBError::internal_error(format!(
            "response checksum mismatch: expected {expected}, computed {actual}"
        )));
    }
    Ok(())
}
