//! Response payloads.
//!
//! Every field tolerates absence so that partial responses from emulators
//! and older service versions still decode.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{
    ConsumedCapacity, Item, ItemCollectionMetrics, Key, KeysAndAttributes, TableDescription,
    WriteRequest,
};

// ---------------------------------------------------------------------------
// Table management
// ---------------------------------------------------------------------------

/// Output for the `CreateTable` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTableOutput {
    /// The table as created.
    #[serde(default)]
    pub table_description: TableDescription,
}

/// Output for the `DeleteTable` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteTableOutput {
    /// The table as it was when deletion started.
    #[serde(default)]
    pub table_description: TableDescription,
}

/// Output for the `DescribeTable` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableOutput {
    /// The table.
    #[serde(rename = "Table", default)]
    pub table: TableDescription,
}

/// Output for the `UpdateTable` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTableOutput {
    /// The table after the change was accepted.
    #[serde(default)]
    pub table_description: TableDescription,
}

// ---------------------------------------------------------------------------
// Item CRUD
// ---------------------------------------------------------------------------

/// Output for the `PutItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemOutput {
    /// Old attributes when `ReturnValues` is `ALL_OLD`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: Item,

    /// The capacity units consumed by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,

    /// Information about item collections modified by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_collection_metrics: Option<ItemCollectionMetrics>,
}

/// Output for the `GetItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemOutput {
    /// The item, or `None` if no item has the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,

    /// The capacity units consumed by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Output for the `UpdateItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateItemOutput {
    /// Attributes selected by `ReturnValues`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: Item,

    /// The capacity units consumed by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,

    /// Information about item collections modified by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_collection_metrics: Option<ItemCollectionMetrics>,
}

/// Output for the `DeleteItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemOutput {
    /// Old attributes when `ReturnValues` is `ALL_OLD`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: Item,

    /// The capacity units consumed by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,

    /// Information about item collections modified by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_collection_metrics: Option<ItemCollectionMetrics>,
}

// ---------------------------------------------------------------------------
// Query & Scan
// ---------------------------------------------------------------------------

/// One page of a `Query`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryOutput {
    /// Matching items. Empty when `Select=COUNT`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,

    /// Items returned after filtering.
    #[serde(default)]
    pub count: i32,

    /// Items evaluated before filtering.
    #[serde(default)]
    pub scanned_count: i32,

    /// Cursor for the next page; empty on the last page.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub last_evaluated_key: Key,

    /// The capacity units consumed by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// One page of a `Scan`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanOutput {
    /// Matching items. Empty when `Select=COUNT`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,

    /// Items returned after filtering.
    #[serde(default)]
    pub count: i32,

    /// Items evaluated before filtering.
    #[serde(default)]
    pub scanned_count: i32,

    /// Cursor for the next page; empty on the last page.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub last_evaluated_key: Key,

    /// The capacity units consumed by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

// ---------------------------------------------------------------------------
// Batch operations
// ---------------------------------------------------------------------------

/// Output for the `BatchGetItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetItemOutput {
    /// Items read, per table.
    #[serde(default)]
    pub responses: HashMap<String, Vec<Item>>,

    /// Keys the service did not get to; resubmit them as `RequestItems`.
    #[serde(default)]
    pub unprocessed_keys: HashMap<String, KeysAndAttributes>,

    /// Capacity consumed, per table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumed_capacity: Vec<ConsumedCapacity>,
}

impl BatchGetItemOutput {
    /// Folds another chunk's output into this one.
    pub fn merge(&mut self, other: Self) {
        for (table, items) in other.responses {
            self.responses.entry(table).or_default().extend(items);
        }
        for (table, pending) in other.unprocessed_keys {
            match self.unprocessed_keys.get_mut(&table) {
                Some(existing) => existing.keys.extend(pending.keys),
                None => {
                    self.unprocessed_keys.insert(table, pending);
                }
            }
        }
        self.consumed_capacity.extend(other.consumed_capacity);
    }
}

/// Output for the `BatchWriteItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemOutput {
    /// Writes the service did not get to; resubmit them as `RequestItems`.
    #[serde(default)]
    pub unprocessed_items: HashMap<String, Vec<WriteRequest>>,

    /// Item collection metrics, per table.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub item_collection_metrics: HashMap<String, Vec<ItemCollectionMetrics>>,

    /// Capacity consumed, per table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumed_capacity: Vec<ConsumedCapacity>,
}

impl BatchWriteItemOutput {
    /// Folds another chunk's output into this one.
    pub fn merge(&mut self, other: Self) {
        for (table, writes) in other.unprocessed_items {
            self.unprocessed_items.entry(table).or_default().extend(writes);
        }
        for (table, metrics) in other.item_collection_metrics {
            self.item_collection_metrics
                .entry(table)
                .or_default()
                .extend(metrics);
        }
        self.consumed_capacity.extend(other.consumed_capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute_value::AttributeValue;

    #[test]
    fn test_should_decode_describe_table_output() {
        let json = serde_json::json!({
            "Table": {
                "TableName": "Thread",
                "TableStatus": "ACTIVE",
                "KeySchema": [
                    {"AttributeName": "ForumName", "KeyType": "HASH"},
                    {"AttributeName": "Subject", "KeyType": "RANGE"}
                ],
                "AttributeDefinitions": [
                    {"AttributeName": "ForumName", "AttributeType": "S"},
                    {"AttributeName": "Subject", "AttributeType": "S"}
                ],
                "ItemCount": 0
            }
        });
        let out: DescribeTableOutput = serde_json::from_value(json).unwrap();
        assert_eq!(out.table.table_name.as_deref(), Some("Thread"));
        assert_eq!(out.table.key_schema.len(), 2);
    }

    #[test]
    fn test_should_decode_scan_page_without_optional_fields() {
        let json = serde_json::json!({
            "Items": [{"ForumName": {"S": "Amazon DynamoDB"}}],
            "Count": 1,
            "ScannedCount": 1
        });
        let out: ScanOutput = serde_json::from_value(json).unwrap();
        assert_eq!(out.items.len(), 1);
        assert!(out.last_evaluated_key.is_empty());
        assert!(out.consumed_capacity.is_none());
    }

    #[test]
    fn test_should_merge_batch_get_outputs() {
        let mut first = BatchGetItemOutput::default();
        first.responses.insert(
            "Thread".to_owned(),
            vec![Item::from([("Id".to_owned(), AttributeValue::from("a"))])],
        );
        let mut second = BatchGetItemOutput::default();
        second.responses.insert(
            "Thread".to_owned(),
            vec![Item::from([("Id".to_owned(), AttributeValue::from("b"))])],
        );
        second.unprocessed_keys.insert(
            "Thread".to_owned(),
            KeysAndAttributes {
                keys: vec![Key::from([("Id".to_owned(), AttributeValue::from("c"))])],
                ..KeysAndAttributes::default()
            },
        );

        first.merge(second);

        assert_eq!(first.responses["Thread"].len(), 2);
        assert_eq!(first.unprocessed_keys["Thread"].keys.len(), 1);
    }
}
