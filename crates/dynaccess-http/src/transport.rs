//! hyper-backed [`Transport`] implementation.

use std::time::Duration;

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde_json::Value;

use dynaccess_model::error::DynamoDBError;
use dynaccess_model::operations::DynamoDBOperation;

use crate::body::RequestBody;
use crate::dispatch::{Transport, TransportFuture};
use crate::request::build_request;
use crate::response::parse_response;

/// Connection settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Base URL of the service.
    pub endpoint: String,
    /// Region the endpoint serves.
    pub region: String,
    /// Upper bound on one request, connect to last body byte.
    pub request_timeout: Duration,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4566".to_owned(),
            region: "us-east-1".to_owned(),
            request_timeout: Duration::from_millis(30_000),
        }
    }
}

impl HttpTransportConfig {
    /// Loads the settings from the environment.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DYNAMODB_ENDPOINT` | `http://localhost:4566` |
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `DYNACCESS_REQUEST_TIMEOUT_MS` | `30000` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("DYNAMODB_ENDPOINT") {
            config.endpoint = v;
        }
        if let Ok(v) = std::env::var("DEFAULT_REGION") {
            config.region = v;
        }
        if let Ok(v) = std::env::var("DYNACCESS_REQUEST_TIMEOUT_MS") {
            if let Ok(ms) = v.parse::<u64>() {
                config.request_timeout = Duration::from_millis(ms);
            }
        }

        config
    }
}

/// Sends requests over HTTP/1.1 to a DynamoDB-compatible endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client<HttpConnector, RequestBody>,
    endpoint: http::Uri,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Creates a transport for `config.endpoint`.
    pub fn new(config: HttpTransportConfig) -> Result<Self, DynamoDBError> {
        let endpoint: http::Uri = config.endpoint.parse().map_err(|e| {
            DynamoDBError::validation(format!("invalid endpoint '{}': {e}", config.endpoint))
        })?;
        let client = Client::builder(TokioExecutor::new()).build_http();
        tracing::info!(endpoint = %endpoint, region = %config.region, "created DynamoDB transport");
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// Creates a transport from [`HttpTransportConfig::from_env`].
    pub fn from_env() -> Result<Self, DynamoDBError> {
        Self::new(HttpTransportConfig::from_env())
    }

    /// The settings this transport was built with.
    #[must_use]
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    async fn send(&self, op: DynamoDBOperation, params: Value) -> Result<Value, DynamoDBError> {
        let request = build_request(&self.endpoint, op, &params)?;

        let exchange = async {
            let response = self.client.request(request).await.map_err(|e| {
                DynamoDBError::internal_error(format!("{op} request failed: {e}")).with_source(e)
            })?;
            let (parts, incoming) = response.into_parts();
            let body = incoming
                .collect()
                .await
                .map(http_body_util::Collected::to_bytes)
                .map_err(|e| {
                    DynamoDBError::internal_error(format!("failed to read {op} response: {e}"))
                        .with_source(e)
                })?;
            Ok::<_, DynamoDBError>((parts, body))
        };

        let (parts, body) = tokio::time::timeout(self.config.request_timeout, exchange)
            .await
            .map_err(|_| {
                DynamoDBError::internal_error(format!(
                    "{op} timed out after {:?}",
                    self.config.request_timeout
                ))
            })??;

        if op.is_control_plane() {
            tracing::info!(operation = %op, status = %parts.status, "control plane response");
        } else {
            tracing::trace!(operation = %op, status = %parts.status, bytes = body.len(), "response");
        }

        parse_response(parts.status, &parts.headers, &body)
    }
}

impl Transport for HttpTransport {
    fn call(&self, op: DynamoDBOperation, params: Value) -> TransportFuture<'_> {
        Box::pin(self.send(op, params))
    }
}
