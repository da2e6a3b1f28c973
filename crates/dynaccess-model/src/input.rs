//! Request payloads for every operation the client issues.
//!
//! Field names serialize in `PascalCase` as the `awsJson1_0` protocol
//! requires. `None` options and empty maps or lists are left out so the
//! payload carries only what the caller asked for.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeValue;
use crate::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, GlobalSecondaryIndexUpdate, Item,
    Key, KeySchemaElement, KeysAndAttributes, LocalSecondaryIndex, ProvisionedThroughput,
    ReturnConsumedCapacity, ReturnItemCollectionMetrics, ReturnValue, Select,
    StreamSpecification, WriteRequest,
};

// ---------------------------------------------------------------------------
// Table management
// ---------------------------------------------------------------------------

/// `CreateTable` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTableInput {
    /// Table name.
    pub table_name: String,

    /// Partition key and optional sort key.
    pub key_schema: Vec<KeySchemaElement>,

    /// Types of the table and index key attributes.
    pub attribute_definitions: Vec<AttributeDefinition>,

    /// `PROVISIONED` or `PAY_PER_REQUEST`; the service assumes provisioned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_mode: Option<BillingMode>,

    /// Capacity of a provisioned table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,

    /// Global secondary indexes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_secondary_indexes: Vec<GlobalSecondaryIndex>,

    /// Local secondary indexes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_secondary_indexes: Vec<LocalSecondaryIndex>,

    /// Stream settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_specification: Option<StreamSpecification>,
}

/// `DeleteTable` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteTableInput {
    /// Table name.
    pub table_name: String,
}

/// `DescribeTable` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableInput {
    /// Table name.
    pub table_name: String,
}

/// `UpdateTable` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTableInput {
    /// Table name.
    pub table_name: String,

    /// New table capacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,

    /// New billing mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_mode: Option<BillingMode>,

    /// Per-index capacity changes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_secondary_index_updates: Vec<GlobalSecondaryIndexUpdate>,
}

// ---------------------------------------------------------------------------
// Item CRUD
// ---------------------------------------------------------------------------

/// `PutItem` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemInput {
    /// Table name.
    pub table_name: String,

    /// The full item, key attributes included.
    pub item: Item,

    /// Condition gating the write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,

    /// `#N` placeholders to attribute names.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,

    /// `:N` placeholders to values.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_values: HashMap<String, AttributeValue>,

    /// Attributes to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValue>,

    /// Consumed capacity detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,

    /// Item collection metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

/// `GetItem` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemInput {
    /// Table name.
    pub table_name: String,

    /// Primary key of the item.
    pub key: Key,

    /// Strongly consistent read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,

    /// Attributes to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,

    /// `#N` placeholders to attribute names.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,

    /// Consumed capacity detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

/// `UpdateItem` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateItemInput {
    /// Table name.
    pub table_name: String,

    /// Primary key of the item.
    pub key: Key,

    /// `SET`/`REMOVE`/`ADD`/`DELETE` clauses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_expression: Option<String>,

    /// Condition gating the write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,

    /// `#N` placeholders to attribute names.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,

    /// `:N` placeholders to values.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_values: HashMap<String, AttributeValue>,

    /// Attributes to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValue>,

    /// Consumed capacity detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,

    /// Item collection metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

/// `DeleteItem` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemInput {
    /// Table name.
    pub table_name: String,

    /// Primary key of the item.
    pub key: Key,

    /// Condition gating the delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,

    /// `#N` placeholders to attribute names.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,

    /// `:N` placeholders to values.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_values: HashMap<String, AttributeValue>,

    /// Attributes to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValue>,

    /// Consumed capacity detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,

    /// Item collection metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

// ---------------------------------------------------------------------------
// Query & Scan
// ---------------------------------------------------------------------------

/// `Query` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryInput {
    /// Table name.
    pub table_name: String,

    /// Secondary index to query instead of the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,

    /// Partition key equality, optionally ANDed with a sort key condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_condition_expression: Option<String>,

    /// Condition applied after the key lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,

    /// Attributes to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,

    /// `#N` placeholders to attribute names.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,

    /// `:N` placeholders to values.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_values: HashMap<String, AttributeValue>,

    /// Ascending (`true`, the default) or descending sort key order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_index_forward: Option<bool>,

    /// Maximum number of items evaluated per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,

    /// Cursor returned as `LastEvaluatedKey` by the previous page.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub exclusive_start_key: Key,

    /// Which attributes to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Select>,

    /// Strongly consistent read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,

    /// Consumed capacity detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

/// `Scan` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanInput {
    /// Table name.
    pub table_name: String,

    /// Secondary index to scan instead of the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,

    /// Condition applied to every evaluated item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,

    /// Attributes to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,

    /// `#N` placeholders to attribute names.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,

    /// `:N` placeholders to values.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_values: HashMap<String, AttributeValue>,

    /// Maximum number of items evaluated per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,

    /// Cursor returned as `LastEvaluatedKey` by the previous page.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub exclusive_start_key: Key,

    /// Segment scanned by this worker of a parallel scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<i32>,

    /// Number of segments of a parallel scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_segments: Option<i32>,

    /// Which attributes to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Select>,

    /// Strongly consistent read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,

    /// Consumed capacity detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

// ---------------------------------------------------------------------------
// Batch operations
// ---------------------------------------------------------------------------

/// `BatchGetItem` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetItemInput {
    /// Keys to read, per table.
    pub request_items: HashMap<String, KeysAndAttributes>,

    /// Consumed capacity detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

/// `BatchWriteItem` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemInput {
    /// Puts and deletes, per table.
    pub request_items: HashMap<String, Vec<WriteRequest>>,

    /// Consumed capacity detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,

    /// Item collection metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}
