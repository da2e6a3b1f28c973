//! Fixtures and a scripted in-memory transport for unit tests.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::time::Instant;

use dynaccess_http::{Transport, TransportFuture};
use dynaccess_model::error::DynamoDBError;
use dynaccess_model::operations::DynamoDBOperation;
use dynaccess_model::output::DescribeTableOutput;
use dynaccess_model::types::TableDescription;

/// `DescribeTable` response for `ci-table`: `ForumName` HASH, `Subject`
/// RANGE, plus `LastPostIndex` on `ForumName`/`LastPostDateTime`.
pub(crate) fn describe_table_json() -> Value {
    json!({
        "Table": {
            "AttributeDefinitions": [
                {"AttributeName": "ForumName", "AttributeType": "S"},
                {"AttributeName": "LastPostDateTime", "AttributeType": "S"},
                {"AttributeName": "Subject", "AttributeType": "S"}
            ],
            "CreationDateTime": 1.363729002358E9,
            "ItemCount": 0,
            "KeySchema": [
                {"AttributeName": "ForumName", "KeyType": "HASH"},
                {"AttributeName": "Subject", "KeyType": "RANGE"}
            ],
            "LocalSecondaryIndexes": [
                {
                    "IndexName": "LastPostIndex",
                    "IndexSizeBytes": 0,
                    "ItemCount": 0,
                    "KeySchema": [
                        {"AttributeName": "ForumName", "KeyType": "HASH"},
                        {"AttributeName": "LastPostDateTime", "KeyType": "RANGE"}
                    ],
                    "Projection": {"ProjectionType": "KEYS_ONLY"}
                }
            ],
            "ProvisionedThroughput": {
                "NumberOfDecreasesToday": 0,
                "ReadCapacityUnits": 5,
                "WriteCapacityUnits": 5
            },
            "TableName": "ci-table",
            "TableSizeBytes": 0,
            "TableStatus": "ACTIVE"
        }
    })
}

pub(crate) fn describe_table_fixture() -> TableDescription {
    let output: DescribeTableOutput = serde_json::from_value(describe_table_json()).unwrap();
    output.table
}

/// One request seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub(crate) operation: DynamoDBOperation,
    pub(crate) params: Value,
    pub(crate) at: Instant,
}

/// Records every call and answers from a queue; `{}` once the queue is empty.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<VecDeque<Result<Value, DynamoDBError>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_ok(&self, response: Value) {
        self.responses.lock().push_back(Ok(response));
    }

    pub(crate) fn push_err(&self, err: DynamoDBError) {
        self.responses.lock().push_back(Err(err));
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub(crate) fn last_params(&self) -> Value {
        self.calls
            .lock()
            .last()
            .map(|c| c.params.clone())
            .unwrap_or(Value::Null)
    }
}

impl Transport for MockTransport {
    fn call(&self, op: DynamoDBOperation, params: Value) -> TransportFuture<'_> {
        self.calls.lock().push(RecordedCall {
            operation: op,
            params,
            at: Instant::now(),
        });
        let response = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})));
        Box::pin(async move { response })
    }
}

/// Installs a test subscriber honoring `RUST_LOG`; safe to call repeatedly.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
