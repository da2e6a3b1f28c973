//! A connection to one table.
//!
//! [`TableConnection`] pairs a table name with a [`Transport`] and the key
//! metadata of the table. The metadata comes from `DescribeTable`, fetched
//! on first use or refreshed by [`TableConnection::describe_table`].

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;

use dynaccess_http::{Transport, dispatch_operation};
use dynaccess_model::output::{
    BatchGetItemOutput, BatchWriteItemOutput, CreateTableOutput, DeleteItemOutput,
    DeleteTableOutput, DescribeTableOutput, GetItemOutput, PutItemOutput, QueryOutput, ScanOutput,
    UpdateItemOutput, UpdateTableOutput,
};
use dynaccess_model::operations::DynamoDBOperation;
use dynaccess_model::types::TableDescription;
use dynaccess_model::{AttributeValue, Item, Key};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::request::{
    BatchGetOptions, BatchWriteOptions, CreateTableOptions, DeleteItemOptions, GetItemOptions,
    PutItemOptions, QueryOptions, ScanOptions, UpdateItemOptions, UpdateTableOptions,
    build_batch_get, build_batch_write, build_create_table, build_delete_item, build_delete_table,
    build_describe_table, build_get_item, build_put_item, build_query, build_scan,
    build_update_item, build_update_table,
};
use crate::scan::{RateLimitedScan, RateLimitedScanOptions};
use crate::table::TableDescriptor;

/// Serializes `input`, sends it as `operation` and decodes the reply.
pub(crate) async fn send<T, I, O>(
    transport: &T,
    operation: DynamoDBOperation,
    input: &I,
) -> ClientResult<O>
where
    T: Transport + ?Sized,
    I: Serialize,
    O: DeserializeOwned,
{
    let params = serde_json::to_value(input)?;
    let response = dispatch_operation(transport, operation, params).await?;
    Ok(serde_json::from_value(response)?)
}

/// Table operations against one table.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use dynaccess_core::request::GetItemOptions;
/// use dynaccess_core::{ClientConfig, TableConnection};
/// use dynaccess_http::{Transport, TransportFuture};
/// use dynaccess_model::operations::DynamoDBOperation;
/// use serde_json::{Value, json};
///
/// #[derive(Debug)]
/// struct Fixed;
///
/// impl Transport for Fixed {
///     fn call(&self, op: DynamoDBOperation, _params: Value) -> TransportFuture<'_> {
///         let body = match op {
///             DynamoDBOperation::DescribeTable => json!({"Table": {
///                 "TableName": "users",
///                 "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}],
///                 "AttributeDefinitions": [{"AttributeName": "id", "AttributeType": "S"}]
///             }}),
///             _ => json!({"Item": {"id": {"S": "u1"}}}),
///         };
///         Box::pin(async move { Ok(body) })
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let conn = TableConnection::new("users", Arc::new(Fixed), ClientConfig::default());
/// let output = conn.get_item("u1", None, GetItemOptions::default()).await.unwrap();
/// assert!(output.item.is_some());
/// # });
/// ```
#[derive(Debug)]
pub struct TableConnection<T: Transport> {
    table_name: String,
    transport: Arc<T>,
    config: Arc<ClientConfig>,
    descriptor: RwLock<Option<Arc<TableDescriptor>>>,
}

impl<T: Transport> TableConnection<T> {
    /// Creates a connection; no request is sent until the first operation.
    pub fn new(table_name: impl Into<String>, transport: Arc<T>, config: ClientConfig) -> Self {
        Self {
            table_name: table_name.into(),
            transport,
            config: Arc::new(config),
            descriptor: RwLock::new(None),
        }
    }

    /// Uses `description` as the table metadata instead of describing it.
    pub fn with_description(self, description: &TableDescription) -> ClientResult<Self> {
        let descriptor = TableDescriptor::from_description(description)?;
        *self.descriptor.write() = Some(Arc::new(descriptor));
        Ok(self)
    }

    /// Table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Client defaults in effect.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Key metadata, describing the table if it is not known yet.
    pub async fn descriptor(&self) -> ClientResult<Arc<TableDescriptor>> {
        if let Some(descriptor) = self.descriptor.read().as_ref() {
            return Ok(Arc::clone(descriptor));
        }
        let (_, descriptor) = self.refresh().await?;
        Ok(descriptor)
    }

    async fn refresh(&self) -> ClientResult<(TableDescription, Arc<TableDescriptor>)> {
        let input = build_describe_table(&self.table_name);
        let output: DescribeTableOutput =
            send(self.transport.as_ref(), DynamoDBOperation::DescribeTable, &input).await?;
        let descriptor = Arc::new(TableDescriptor::from_description(&output.table)?);
        tracing::info!(
            table = %self.table_name,
            hash_key = %descriptor.hash_key(),
            range_key = ?descriptor.range_key(),
            "refreshed table descriptor"
        );
        *self.descriptor.write() = Some(Arc::clone(&descriptor));
        Ok((output.table, descriptor))
    }

    // -----------------------------------------------------------------------
    // Table lifecycle
    // -----------------------------------------------------------------------

    /// Describes the table and replaces the cached key metadata.
    pub async fn describe_table(&self) -> ClientResult<TableDescription> {
        let (description, _) = self.refresh().await?;
        Ok(description)
    }

    /// Creates the table.
    pub async fn create_table(&self, options: CreateTableOptions) -> ClientResult<TableDescription> {
        let input = build_create_table(&self.table_name, options)?;
        let output: CreateTableOutput =
            send(self.transport.as_ref(), DynamoDBOperation::CreateTable, &input).await?;
        Ok(output.table_description)
    }

    /// Deletes the table and forgets its key metadata.
    pub async fn delete_table(&self) -> ClientResult<TableDescription> {
        let input = build_delete_table(&self.table_name);
        let output: DeleteTableOutput =
            send(self.transport.as_ref(), DynamoDBOperation::DeleteTable, &input).await?;
        *self.descriptor.write() = None;
        Ok(output.table_description)
    }

    /// Changes table or index throughput.
    pub async fn update_table(&self, options: UpdateTableOptions) -> ClientResult<TableDescription> {
        let input = build_update_table(&self.table_name, options)?;
        let output: UpdateTableOutput =
            send(self.transport.as_ref(), DynamoDBOperation::UpdateTable, &input).await?;
        Ok(output.table_description)
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    pub async fn get_item(
        &self,
        hash_key: impl Into<AttributeValue>,
        range_key: Option<AttributeValue>,
        options: GetItemOptions,
    ) -> ClientResult<GetItemOutput> {
        let table = self.descriptor().await?;
        let input = build_get_item(&table, hash_key.into(), range_key, options)?;
        send(self.transport.as_ref(), DynamoDBOperation::GetItem, &input).await
    }

    pub async fn put_item(
        &self,
        hash_key: impl Into<AttributeValue>,
        range_key: Option<AttributeValue>,
        attributes: Item,
        options: PutItemOptions,
    ) -> ClientResult<PutItemOutput> {
        let table = self.descriptor().await?;
        let input = build_put_item(
            &table,
            &self.config,
            hash_key.into(),
            range_key,
            attributes,
            options,
        )?;
        send(self.transport.as_ref(), DynamoDBOperation::PutItem, &input).await
    }

    pub async fn update_item(
        &self,
        hash_key: impl Into<AttributeValue>,
        range_key: Option<AttributeValue>,
        options: UpdateItemOptions,
    ) -> ClientResult<UpdateItemOutput> {
        let table = self.descriptor().await?;
        let input = build_update_item(&table, &self.config, hash_key.into(), range_key, options)?;
        send(self.transport.as_ref(), DynamoDBOperation::UpdateItem, &input).await
    }

    pub async fn delete_item(
        &self,
        hash_key: impl Into<AttributeValue>,
        range_key: Option<AttributeValue>,
        options: DeleteItemOptions,
    ) -> ClientResult<DeleteItemOutput> {
        let table = self.descriptor().await?;
        let input = build_delete_item(&table, &self.config, hash_key.into(), range_key, options)?;
        send(self.transport.as_ref(), DynamoDBOperation::DeleteItem, &input).await
    }

    // -----------------------------------------------------------------------
    // Query & Scan
    // -----------------------------------------------------------------------

    /// Fetches one page of items in partition `hash_key`.
    pub async fn query(
        &self,
        hash_key: impl Into<AttributeValue>,
        options: QueryOptions,
    ) -> ClientResult<QueryOutput> {
        let table = self.descriptor().await?;
        let input = build_query(&table, &self.config, hash_key.into(), options)?;
        send(self.transport.as_ref(), DynamoDBOperation::Query, &input).await
    }

    /// Fetches one page of a scan.
    pub async fn scan(&self, options: ScanOptions) -> ClientResult<ScanOutput> {
        let table = self.descriptor().await?;
        let input = build_scan(&table, &self.config, options)?;
        send(self.transport.as_ref(), DynamoDBOperation::Scan, &input).await
    }

    /// Starts a paced scan; see [`RateLimitedScan`].
    pub async fn rate_limited_scan(
        &self,
        options: RateLimitedScanOptions,
    ) -> ClientResult<RateLimitedScan<T>> {
        let table = self.descriptor().await?;
        RateLimitedScan::new(
            Arc::clone(&self.transport),
            table,
            Arc::clone(&self.config),
            options,
        )
    }

    // -----------------------------------------------------------------------
    // Batches
    // -----------------------------------------------------------------------

    /// Reads `keys`, one call per 100 keys, and merges the results.
    ///
    /// Keys left in `unprocessed_keys` were not read and can be retried.
    pub async fn batch_get_item(
        &self,
        keys: Vec<Key>,
        options: BatchGetOptions,
    ) -> ClientResult<BatchGetItemOutput> {
        let table = self.descriptor().await?;
        let inputs = build_batch_get(&table, &self.config, keys, options)?;
        let chunks = inputs.len();

        let mut merged = BatchGetItemOutput::default();
        for (i, input) in inputs.iter().enumerate() {
            tracing::debug!(table = %self.table_name, chunk = i + 1, chunks, "batch get chunk");
            let output: BatchGetItemOutput =
                send(self.transport.as_ref(), DynamoDBOperation::BatchGetItem, input).await?;
            merged.merge(output);
        }
        Ok(merged)
    }

    /// Writes `put_items` then deletes `delete_keys`, one call per 25 writes,
    /// and merges the results.
    pub async fn batch_write_item(
        &self,
        put_items: Vec<Item>,
        delete_keys: Vec<Key>,
        options: BatchWriteOptions,
    ) -> ClientResult<BatchWriteItemOutput> {
        let table = self.descriptor().await?;
        let inputs = build_batch_write(&table, &self.config, put_items, delete_keys, options)?;
        let chunks = inputs.len();

        let mut merged = BatchWriteItemOutput::default();
        for (i, input) in inputs.iter().enumerate() {
            tracing::debug!(table = %self.table_name, chunk = i + 1, chunks, "batch write chunk");
            let output: BatchWriteItemOutput =
                send(self.transport.as_ref(), DynamoDBOperation::BatchWriteItem, input).await?;
            merged.merge(output);
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ClientError;
    use crate::expression::Path;
    use crate::scan::ScanBudget;
    use crate::test_support::{MockTransport, describe_table_json, init_tracing};

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_owned())
    }

    async fn described() -> (Arc<MockTransport>, TableConnection<MockTransport>) {
        init_tracing();
        let transport = Arc::new(MockTransport::new());
        let conn = TableConnection::new("ci-table", Arc::clone(&transport), ClientConfig::default());
        transport.push_ok(describe_table_json());
        conn.describe_table().await.unwrap();
        (transport, conn)
    }

    #[tokio::test]
    async fn test_should_send_describe_table() {
        let (transport, conn) = described().await;
        assert_eq!(conn.table_name(), "ci-table");
        let calls = transport.calls();
        assert_eq!(calls[0].operation, DynamoDBOperation::DescribeTable);
        assert_eq!(calls[0].params, json!({"TableName": "ci-table"}));
        assert_eq!(conn.descriptor().await.unwrap().hash_key(), "ForumName");
    }

    #[tokio::test]
    async fn test_should_describe_lazily_on_first_item_operation() {
        let transport = Arc::new(MockTransport::new());
        let conn = TableConnection::new("ci-table", Arc::clone(&transport), ClientConfig::default());
        transport.push_ok(describe_table_json());
        transport.push_ok(json!({}));

        conn.delete_item(
            "Amazon DynamoDB",
            Some(s("How do I update multiple items?")),
            DeleteItemOptions::default(),
        )
        .await
        .unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].operation, DynamoDBOperation::DescribeTable);
        assert_eq!(
            calls[1].params,
            json!({
                "ReturnConsumedCapacity": "TOTAL",
                "Key": {
                    "ForumName": {"S": "Amazon DynamoDB"},
                    "Subject": {"S": "How do I update multiple items?"}
                },
                "TableName": "ci-table"
            })
        );
    }

    #[tokio::test]
    async fn test_should_use_supplied_description_without_describing() {
        let transport = Arc::new(MockTransport::new());
        let conn = TableConnection::new("ci-table", Arc::clone(&transport), ClientConfig::default())
            .with_description(&crate::test_support::describe_table_fixture())
            .unwrap();
        conn.scan(ScanOptions::default()).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].operation, DynamoDBOperation::Scan);
        assert_eq!(
            calls[0].params,
            json!({"ReturnConsumedCapacity": "TOTAL", "TableName": "ci-table"})
        );
    }

    #[tokio::test]
    async fn test_should_reject_create_table_before_sending() {
        let transport = Arc::new(MockTransport::new());
        let conn = TableConnection::new("ci-table", Arc::clone(&transport), ClientConfig::default());
        let err = conn
            .create_table(CreateTableOptions {
                read_capacity_units: Some(1),
                write_capacity_units: Some(1),
                ..CreateTableOptions::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_should_send_delete_and_update_table() {
        let transport = Arc::new(MockTransport::new());
        let conn = TableConnection::new("ci-table", Arc::clone(&transport), ClientConfig::default());

        conn.delete_table().await.unwrap();
        assert_eq!(transport.last_params(), json!({"TableName": "ci-table"}));

        conn.update_table(UpdateTableOptions {
            read_capacity_units: Some(2),
            write_capacity_units: Some(2),
            ..UpdateTableOptions::default()
        })
        .await
        .unwrap();
        assert_eq!(
            transport.last_params(),
            json!({
                "ProvisionedThroughput": {"WriteCapacityUnits": 2, "ReadCapacityUnits": 2},
                "TableName": "ci-table"
            })
        );
    }

    #[tokio::test]
    async fn test_should_decode_get_item() {
        let (transport, conn) = described().await;
        transport.push_ok(json!({
            "Item": {
                "ForumName": {"S": "Amazon DynamoDB"},
                "Subject": {"S": "How do I update multiple items?"},
                "Replies": {"N": "5"}
            }
        }));

        let output = conn
            .get_item(
                "Amazon DynamoDB",
                Some(s("How do I update multiple items?")),
                GetItemOptions::default(),
            )
            .await
            .unwrap();
        let item = output.item.unwrap();
        assert_eq!(item["Replies"], AttributeValue::N("5".to_owned()));
        assert_eq!(transport.calls()[1].operation, DynamoDBOperation::GetItem);
    }

    #[tokio::test]
    async fn test_should_send_query() {
        let (transport, conn) = described().await;
        conn.query(
            "FooForum",
            QueryOptions {
                range_key_condition: Some(Path::new("Subject").begins_with("thread")),
                ..QueryOptions::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(
            transport.last_params()["KeyConditionExpression"],
            "(#0 = :0 AND begins_with (#1, :1))"
        );
    }

    #[tokio::test]
    async fn test_should_surface_service_errors() {
        let (transport, conn) = described().await;
        transport.push_err(dynaccess_model::dynamodb_error!(
            ConditionalCheckFailedException,
            "The conditional request failed"
        ));
        let err = conn
            .put_item(
                "foo-key",
                Some(s("foo-range-key")),
                Item::new(),
                PutItemOptions {
                    condition: Some(Path::new("ForumName").does_not_exist()),
                    ..PutItemOptions::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Service(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_should_merge_batch_write_chunks() {
        let (transport, conn) = described().await;
        let items: Vec<Item> = (0..30)
            .map(|i| {
                Item::from([
                    ("ForumName".to_owned(), s("FooForum")),
                    ("Subject".to_owned(), s(&format!("thread-{i}"))),
                ])
            })
            .collect();
        transport.push_ok(json!({}));
        transport.push_ok(json!({
            "UnprocessedItems": {
                "ci-table": [{"PutRequest": {"Item": {
                    "ForumName": {"S": "FooForum"}, "Subject": {"S": "thread-29"}
                }}}]
            }
        }));

        let output = conn
            .batch_write_item(items, Vec::new(), BatchWriteOptions::default())
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[1].params["RequestItems"]["ci-table"]
                .as_array()
                .map(Vec::len),
            Some(25)
        );
        assert_eq!(output.unprocessed_items["ci-table"].len(), 1);
    }

    #[tokio::test]
    async fn test_should_merge_batch_get_responses() {
        let (transport, conn) = described().await;
        let keys: Vec<Key> = (0..2)
            .map(|i| {
                Key::from([
                    ("ForumName".to_owned(), s("FooForum")),
                    ("Subject".to_owned(), s(&format!("thread-{i}"))),
                ])
            })
            .collect();
        transport.push_ok(json!({
            "Responses": {"ci-table": [{"ForumName": {"S": "FooForum"}, "Subject": {"S": "thread-0"}}]},
            "UnprocessedKeys": {}
        }));

        let output = conn
            .batch_get_item(keys, BatchGetOptions::default())
            .await
            .unwrap();
        assert_eq!(output.responses["ci-table"].len(), 1);
        assert_eq!(transport.calls()[1].operation, DynamoDBOperation::BatchGetItem);
    }

    #[tokio::test]
    async fn test_should_start_rate_limited_scan() {
        let (transport, conn) = described().await;
        let options = RateLimitedScanOptions {
            scan: ScanOptions {
                attributes_to_get: vec!["Subject".to_owned()],
                consistent_read: Some(true),
                index_name: Some("LastPostIndex".to_owned()),
                ..ScanOptions::default()
            },
            page_size: Some(1),
            limit: Some(2),
            budget: ScanBudget::from_config(conn.config(), 12),
        };
        transport.push_ok(json!({
            "Items": [{"ForumName": {"S": "FooForum"}, "Subject": {"S": "thread-0"}}],
            "ConsumedCapacity": {"TableName": "ci-table", "CapacityUnits": 0.5}
        }));

        let mut scan = conn.rate_limited_scan(options).await.unwrap();
        let items = scan.next_page().await.unwrap().unwrap();
        assert_eq!(items.len(), 1);
        assert!(scan.is_done());

        let params = transport.last_params();
        assert_eq!(params["Limit"], 1);
        assert_eq!(params["IndexName"], "LastPostIndex");
        assert_eq!(params["ConsistentRead"], true);
        assert_eq!(params["ProjectionExpression"], "#0");
    }
}
