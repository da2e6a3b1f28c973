//! The transport seam and operation dispatch.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use dynaccess_model::error::DynamoDBError;
use dynaccess_model::operations::DynamoDBOperation;

/// Future returned by [`Transport::call`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, DynamoDBError>> + Send + 'a>>;

/// Sends one API action with its JSON parameters and returns the JSON reply.
///
/// This is the boundary between request construction and the network. A
/// failure carries the service error code, so callers can tell throttling
/// apart from other faults.
pub trait Transport: Send + Sync + 'static {
    /// Issue `op` with `params` as the request body.
    fn call(&self, op: DynamoDBOperation, params: Value) -> TransportFuture<'_>;
}

impl<T: Transport> Transport for Arc<T> {
    fn call(&self, op: DynamoDBOperation, params: Value) -> TransportFuture<'_> {
        self.as_ref().call(op, params)
    }
}

/// Dispatch an operation through the transport.
pub async fn dispatch_operation<T: Transport + ?Sized>(
    transport: &T,
    op: DynamoDBOperation,
    params: Value,
) -> Result<Value, DynamoDBError> {
    let table = params
        .get("TableName")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    tracing::debug!(operation = %op, table = %table, "dispatching DynamoDB operation");
    let result = transport.call(op, params).await;
    if let Err(err) = &result {
        tracing::debug!(operation = %op, table = %table, code = %err.code, "DynamoDB operation failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records every call and answers with an empty object.
    #[derive(Debug, Default)]
    struct Recorder {
        calls: Mutex<Vec<(DynamoDBOperation, Value)>>,
    }

    impl Transport for Recorder {
        fn call(&self, op: DynamoDBOperation, params: Value) -> TransportFuture<'_> {
            Box::pin(async move {
                if op == DynamoDBOperation::DeleteTable {
                    return Err(dynaccess_model::dynamodb_error!(ResourceInUseException));
                }
                self.calls.lock().unwrap().push((op, params));
                Ok(serde_json::json!({}))
            })
        }
    }

    #[tokio::test]
    async fn test_should_forward_operation_and_params() {
        let transport = Arc::new(Recorder::default());
        let params = serde_json::json!({"TableName": "Thread"});
        let reply = dispatch_operation(&transport, DynamoDBOperation::DescribeTable, params.clone())
            .await
            .unwrap();
        assert_eq!(reply, serde_json::json!({}));

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, DynamoDBOperation::DescribeTable);
        assert_eq!(calls[0].1, params);
    }

    #[tokio::test]
    async fn test_should_surface_service_error() {
        let transport = Recorder::default();
        let err = dispatch_operation(
            &transport,
            DynamoDBOperation::DeleteTable,
            serde_json::json!({"TableName": "Thread"}),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.code,
            dynaccess_model::error::DynamoDBErrorCode::ResourceInUseException
        );
        assert!(transport.calls.lock().unwrap().is_empty());
    }
}
