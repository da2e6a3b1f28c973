//! DynamoDB service errors as seen by the client.
//!
//! Error responses carry a `__type` such as
//! `com.amazonaws.dynamodb.v20120810#ProvisionedThroughputExceededException`
//! and a `message` (or `Message`). The part after `#` selects the
//! [`DynamoDBErrorCode`].

use std::fmt;

macro_rules! error_codes {
    ($( $(#[$meta:meta])* $code:ident ),+ $(,)?) => {
        /// Known DynamoDB error codes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[non_exhaustive]
        pub enum DynamoDBErrorCode {
            $( $(#[$meta])* $code, )+
            /// A code this client does not know about.
            #[default]
            Unknown,
        }

        impl DynamoDBErrorCode {
            /// Returns the short error code string.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$code => stringify!($code), )+
                    Self::Unknown => "UnknownError",
                }
            }

            /// Looks up a code by its short name.
            #[must_use]
            pub fn from_name(name: &str) -> Self {
                match name {
                    $( stringify!($code) => Self::$code, )+
                    _ => Self::Unknown,
                }
            }
        }
    };
}

error_codes! {
    /// The table is being created, updated or deleted.
    ResourceInUseException,
    /// The table or index does not exist.
    ResourceNotFoundException,
    /// A condition expression evaluated to false.
    ConditionalCheckFailedException,
    /// An item collection grew past the size limit.
    ItemCollectionSizeLimitExceededException,
    /// The table or index ran out of provisioned capacity.
    ProvisionedThroughputExceededException,
    /// The account-level request rate was exceeded.
    RequestLimitExceeded,
    /// The control plane rejected the request rate.
    ThrottlingException,
    /// Too many concurrent control plane operations.
    LimitExceededException,
    /// The request failed validation.
    ValidationException,
    /// The request body could not be parsed.
    SerializationException,
    /// The service failed internally.
    InternalServerError,
    /// The service is temporarily unavailable.
    ServiceUnavailable,
    /// The caller is not authorized.
    AccessDeniedException,
    /// The credentials or target were not recognized.
    UnrecognizedClientException,
}

impl DynamoDBErrorCode {
    /// Parses a `__type` value, with or without its namespace prefix.
    #[must_use]
    pub fn from_type(error_type: &str) -> Self {
        let name = error_type
            .rsplit_once('#')
            .map_or(error_type, |(_, name)| name);
        Self::from_name(name)
    }

    /// Returns `true` for codes that mean "slow down and retry".
    #[must_use]
    pub fn is_throttling(&self) -> bool {
        matches!(
            self,
            Self::ProvisionedThroughputExceededException
                | Self::RequestLimitExceeded
                | Self::ThrottlingException
        )
    }

    /// Returns the HTTP status the service uses for this code.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::InternalServerError | Self::Unknown => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => http::StatusCode::SERVICE_UNAVAILABLE,
            _ => http::StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for DynamoDBErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed request, as reported by the service or the transport.
#[derive(Debug)]
pub struct DynamoDBError {
    /// The error code.
    pub code: DynamoDBErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for DynamoDBError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynamoDBError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for DynamoDBError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl DynamoDBError {
    /// Creates an error whose message is the code name.
    #[must_use]
    pub fn new(code: DynamoDBErrorCode) -> Self {
        Self::with_message(code, code.as_str())
    }

    /// Creates an error with a custom message.
    #[must_use]
    pub fn with_message(code: DynamoDBErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Overrides the HTTP status.
    #[must_use]
    pub fn with_status(mut self, status_code: http::StatusCode) -> Self {
        self.status_code = status_code;
        self
    }

    /// Sets the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns `true` if the request may succeed when retried after a delay.
    #[must_use]
    pub fn is_throttling(&self) -> bool {
        self.code.is_throttling()
    }

    /// Validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(DynamoDBErrorCode::ValidationException, message)
    }

    /// The response body could not be understood.
    #[must_use]
    pub fn serialization_exception(message: impl Into<String>) -> Self {
        Self::with_message(DynamoDBErrorCode::SerializationException, message)
    }

    /// The request never produced a service response.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(DynamoDBErrorCode::InternalServerError, message)
    }
}

/// Create a `DynamoDBError` from an error code.
///
/// # Examples
///
/// ```
/// use dynaccess_model::dynamodb_error;
/// use dynaccess_model::error::DynamoDBErrorCode;
///
/// let err = dynamodb_error!(ProvisionedThroughputExceededException);
/// assert!(err.is_throttling());
///
/// let err = dynamodb_error!(ResourceNotFoundException, "Table not found");
/// assert_eq!(err.code, DynamoDBErrorCode::ResourceNotFoundException);
/// assert_eq!(err.message, "Table not found");
/// ```
#[macro_export]
macro_rules! dynamodb_error {
    ($code:ident) => {
        $crate::error::DynamoDBError::new($crate::error::DynamoDBErrorCode::$code)
    };
    ($code:ident, $msg:expr) => {
        $crate::error::DynamoDBError::with_message($crate::error::DynamoDBErrorCode::$code, $msg)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_namespaced_error_type() {
        assert_eq!(
            DynamoDBErrorCode::from_type(
                "com.amazonaws.dynamodb.v20120810#ProvisionedThroughputExceededException"
            ),
            DynamoDBErrorCode::ProvisionedThroughputExceededException
        );
        assert_eq!(
            DynamoDBErrorCode::from_type("com.amazon.coral.validate#ValidationException"),
            DynamoDBErrorCode::ValidationException
        );
    }

    #[test]
    fn test_should_fall_back_to_unknown_code() {
        let code = DynamoDBErrorCode::from_type("com.example#SomethingNew");
        assert_eq!(code, DynamoDBErrorCode::Unknown);
        assert_eq!(code.as_str(), "UnknownError");
    }

    #[test]
    fn test_should_classify_throttling_codes() {
        assert!(DynamoDBErrorCode::ThrottlingException.is_throttling());
        assert!(DynamoDBErrorCode::RequestLimitExceeded.is_throttling());
        assert!(!DynamoDBErrorCode::ConditionalCheckFailedException.is_throttling());
    }

    #[test]
    fn test_should_build_error_with_macro() {
        let err = dynamodb_error!(ConditionalCheckFailedException, "The conditional request failed");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "DynamoDBError(ConditionalCheckFailedException): The conditional request failed"
        );
    }
}
