//! Client error type.

use std::time::Duration;

use dynaccess_model::CodecError;
use dynaccess_model::error::DynamoDBError;

use crate::expression::ExpressionError;

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Everything a [`TableConnection`](crate::TableConnection) call can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Arguments rejected before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A condition, update or projection could not be compiled.
    #[error(transparent)]
    Compile(#[from] ExpressionError),

    /// The service (or the transport) reported a failure.
    #[error(transparent)]
    Service(#[from] DynamoDBError),

    /// A rate-limited scan kept being throttled.
    #[error("Scan throttled {attempts} consecutive times; last error: {last}")]
    Exhausted {
        /// Consecutive throttled attempts.
        attempts: u32,
        /// The last throttling error.
        last: Box<DynamoDBError>,
    },

    /// A rate-limited scan ran past its deadline.
    #[error("Scan timed out after {0:?}")]
    ScanTimeout(Duration),

    /// A scan page came back without `ConsumedCapacity`.
    #[error(
        "Scan response is missing ConsumedCapacity; request TOTAL capacity or allow scanning without it"
    )]
    MissingConsumedCapacity,

    /// A request or response did not match the expected JSON shape.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An attribute value could not be converted.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ClientError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns `true` if the same call may succeed after a delay.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Service(err) if err.is_throttling())
    }

    /// The service error, if the failure came from the service.
    #[must_use]
    pub fn as_service(&self) -> Option<&DynamoDBError> {
        match self {
            Self::Service(err) => Some(err),
            Self::Exhausted { last, .. } => Some(last),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use dynaccess_model::dynamodb_error;
    use dynaccess_model::error::DynamoDBErrorCode;

    use super::*;

    #[test]
    fn test_should_classify_retryable_errors() {
        let throttled = ClientError::from(dynamodb_error!(ProvisionedThroughputExceededException));
        assert!(throttled.is_retryable());

        let failed = ClientError::from(dynamodb_error!(ConditionalCheckFailedException));
        assert!(!failed.is_retryable());
        assert!(!ClientError::validation("bad").is_retryable());
    }

    #[test]
    fn test_should_expose_service_error() {
        let err = ClientError::Exhausted {
            attempts: 3,
            last: Box::new(dynamodb_error!(ThrottlingException)),
        };
        assert_eq!(
            err.as_service().map(|e| e.code),
            Some(DynamoDBErrorCode::ThrottlingException)
        );
        assert!(err.to_string().contains("3 consecutive times"));
    }

    #[test]
    fn test_should_wrap_expression_errors() {
        let err = ClientError::from(ExpressionError::EmptyUpdate);
        assert_eq!(
            err.to_string(),
            "Update expression requires at least one action"
        );
    }
}
