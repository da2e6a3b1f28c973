//! Request body type sent to the service.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::Full;

/// Body of an outgoing DynamoDB request.
///
/// Requests always carry a buffered JSON document; `Empty` exists for
/// probes that send no payload.
#[derive(Debug, Default)]
pub enum RequestBody {
    /// A fully buffered JSON payload.
    Buffered(Full<Bytes>),
    /// No payload.
    #[default]
    Empty,
}

impl RequestBody {
    /// Creates a body from a serialized JSON document.
    #[must_use]
    pub fn from_json(json: Vec<u8>) -> Self {
        Self::Buffered(Full::new(Bytes::from(json)))
    }

    /// Creates an empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty
    }
}

impl http_body::Body for RequestBody {
    type Data = Bytes;
    type Error = std::convert::Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Buffered(full) => Pin::new(full).poll_frame(cx),
            Self::Empty => Poll::Ready(None),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Buffered(full) => full.is_end_stream(),
            Self::Empty => true,
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            Self::Buffered(full) => full.size_hint(),
            Self::Empty => http_body::SizeHint::with_exact(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body::Body;
    use http_body_util::BodyExt;

    use super::*;

    #[tokio::test]
    async fn test_should_yield_buffered_json() {
        let body = RequestBody::from_json(br#"{"TableName":"Thread"}"#.to_vec());
        assert_eq!(body.size_hint().exact(), Some(22));
        let bytes = body.collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], br#"{"TableName":"Thread"}"#);
    }

    #[test]
    fn test_should_report_empty_body_as_ended() {
        let body = RequestBody::empty();
        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));
    }
}
