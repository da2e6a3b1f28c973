//! Request framing for the `awsJson1_0` protocol.
//!
//! ```text
//! POST / HTTP/1.1
//! Content-Type: application/x-amz-json-1.0
//! X-Amz-Target: DynamoDB_20120810.PutItem
//! ```

use dynaccess_model::error::DynamoDBError;
use dynaccess_model::operations::DynamoDBOperation;

use crate::body::RequestBody;

/// Prefix of every `X-Amz-Target` value.
pub const TARGET_PREFIX: &str = "DynamoDB_20120810.";

/// Content type of DynamoDB JSON requests and responses.
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.0";

/// Returns the `X-Amz-Target` value for `op`.
#[must_use]
pub fn target_header(op: DynamoDBOperation) -> String {
    format!("{TARGET_PREFIX}{}", op.as_str())
}

/// Builds the HTTP request for `op` against `endpoint`.
pub fn build_request(
    endpoint: &http::Uri,
    op: DynamoDBOperation,
    params: &serde_json::Value,
) -> Result<http::Request<RequestBody>, DynamoDBError> {
    let json = serde_json::to_vec(params)
        .map_err(|e| DynamoDBError::serialization_exception(e.to_string()))?;
    let invocation_id = uuid::Uuid::new_v4().to_string();

    http::Request::builder()
        .method(http::Method::POST)
        .uri(endpoint.clone())
        .header(http::header::CONTENT_TYPE, CONTENT_TYPE)
        .header("x-amz-target", target_header(op))
        .header("amz-sdk-invocation-id", invocation_id)
        .header(http::header::CONTENT_LENGTH, json.len())
        .body(RequestBody::from_json(json))
        .map_err(|e| {
            DynamoDBError::internal_error(format!("failed to build {op} request: {e}"))
                .with_source(e)
        })
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    #[test]
    fn test_should_format_target_header() {
        assert_eq!(
            target_header(DynamoDBOperation::BatchWriteItem),
            "DynamoDB_20120810.BatchWriteItem"
        );
    }

    #[tokio::test]
    async fn test_should_build_post_with_protocol_headers() {
        let endpoint: http::Uri = "http://localhost:4566".parse().unwrap();
        let params = serde_json::json!({"TableName": "Thread"});
        let req = build_request(&endpoint, DynamoDBOperation::Scan, &params).unwrap();

        assert_eq!(req.method(), http::Method::POST);
        assert_eq!(req.uri(), &endpoint);
        assert_eq!(req.headers().get("content-type").unwrap(), CONTENT_TYPE);
        assert_eq!(
            req.headers().get("x-amz-target").unwrap(),
            "DynamoDB_20120810.Scan"
        );
        assert!(req.headers().get("amz-sdk-invocation-id").is_some());

        let body = req.into_body().collect().await.unwrap().to_bytes();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed, params);
    }
}
