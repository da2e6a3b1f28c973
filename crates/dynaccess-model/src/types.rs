//! Shared DynamoDB types used by the operation inputs and outputs.
//!
//! Structs use `#[serde(rename_all = "PascalCase")]` to match the wire
//! protocol. Enum variants keep Rust naming and map onto the
//! `SCREAMING_SNAKE_CASE` strings the service expects through
//! [`wire_enum!`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeValue;

/// A string did not name any variant of a wire enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be one of {expected:?}, got '{value}'")]
pub struct UnknownVariant {
    /// The enum being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
    /// Every accepted wire string.
    pub expected: &'static [&'static str],
}

/// Declares a fieldless enum whose serde, `Display` and `FromStr` forms are
/// the given wire strings. `FromStr` accepts any ASCII case.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// Every wire string, in declaration order.
            pub const WIRE_NAMES: &'static [&'static str] = &[$($wire),+];

            /// Returns the DynamoDB wire-format string.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($wire) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownVariant {
                    kind: stringify!($name),
                    value: s.to_owned(),
                    expected: Self::WIRE_NAMES,
                })
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

wire_enum! {
    /// Role of an attribute within a key schema.
    pub enum KeyType {
        /// Partition key.
        Hash => "HASH",
        /// Sort key.
        Range => "RANGE",
    }
}

wire_enum! {
    /// Scalar types allowed for key attributes.
    pub enum ScalarAttributeType {
        /// String.
        S => "S",
        /// Number.
        N => "N",
        /// Binary.
        B => "B",
    }
}

wire_enum! {
    /// Lifecycle status of a table.
    pub enum TableStatus {
        /// Being created.
        Creating => "CREATING",
        /// Being updated.
        Updating => "UPDATING",
        /// Being deleted.
        Deleting => "DELETING",
        /// Ready for use.
        Active => "ACTIVE",
        /// The KMS key is inaccessible.
        InaccessibleEncryptionCredentials => "INACCESSIBLE_ENCRYPTION_CREDENTIALS",
        /// Being archived.
        Archiving => "ARCHIVING",
        /// Archived.
        Archived => "ARCHIVED",
    }
}

wire_enum! {
    /// Billing mode of a table.
    pub enum BillingMode {
        /// Explicit read/write capacity units.
        Provisioned => "PROVISIONED",
        /// On-demand capacity.
        PayPerRequest => "PAY_PER_REQUEST",
    }
}

wire_enum! {
    /// Which attributes a secondary index projects.
    pub enum ProjectionType {
        /// Every attribute.
        All => "ALL",
        /// Only the key attributes.
        KeysOnly => "KEYS_ONLY",
        /// Keys plus `NonKeyAttributes`.
        Include => "INCLUDE",
    }
}

wire_enum! {
    /// What a stream record carries.
    pub enum StreamViewType {
        /// The item after modification.
        NewImage => "NEW_IMAGE",
        /// The item before modification.
        OldImage => "OLD_IMAGE",
        /// Both images.
        NewAndOldImages => "NEW_AND_OLD_IMAGES",
        /// Only the key attributes.
        KeysOnly => "KEYS_ONLY",
    }
}

wire_enum! {
    /// Lifecycle status of a global secondary index.
    pub enum IndexStatus {
        /// Being created.
        Creating => "CREATING",
        /// Being updated.
        Updating => "UPDATING",
        /// Being deleted.
        Deleting => "DELETING",
        /// Ready for use.
        Active => "ACTIVE",
    }
}

wire_enum! {
    /// Attributes returned by write operations.
    pub enum ReturnValue {
        /// Nothing.
        None => "NONE",
        /// The whole item before the write.
        AllOld => "ALL_OLD",
        /// The updated attributes before the write.
        UpdatedOld => "UPDATED_OLD",
        /// The whole item after the write.
        AllNew => "ALL_NEW",
        /// The updated attributes after the write.
        UpdatedNew => "UPDATED_NEW",
    }
}

wire_enum! {
    /// Level of consumed-capacity detail in responses.
    pub enum ReturnConsumedCapacity {
        /// Table and per-index totals.
        Indexes => "INDEXES",
        /// The aggregate total only.
        Total => "TOTAL",
        /// No capacity information.
        None => "NONE",
    }
}

wire_enum! {
    /// Whether item collection metrics are returned for writes.
    pub enum ReturnItemCollectionMetrics {
        /// Size estimates.
        Size => "SIZE",
        /// No metrics.
        None => "NONE",
    }
}

wire_enum! {
    /// Attributes returned by `Query` and `Scan`.
    pub enum Select {
        /// Every attribute of each item.
        AllAttributes => "ALL_ATTRIBUTES",
        /// Every attribute projected into the index.
        AllProjectedAttributes => "ALL_PROJECTED_ATTRIBUTES",
        /// Only the attributes named by `ProjectionExpression`.
        SpecificAttributes => "SPECIFIC_ATTRIBUTES",
        /// Only the number of matching items.
        Count => "COUNT",
    }
}

wire_enum! {
    /// Joins the entries of a legacy condition map.
    pub enum ConditionalOperator {
        /// Every entry must hold.
        And => "AND",
        /// At least one entry must hold.
        Or => "OR",
    }
}

wire_enum! {
    /// Operator of a legacy `Condition` entry.
    pub enum ComparisonOperator {
        /// Equal.
        Eq => "EQ",
        /// Not equal.
        Ne => "NE",
        /// Less than or equal.
        Le => "LE",
        /// Less than.
        Lt => "LT",
        /// Greater than or equal.
        Ge => "GE",
        /// Greater than.
        Gt => "GT",
        /// The attribute exists.
        NotNull => "NOT_NULL",
        /// The attribute does not exist.
        Null => "NULL",
        /// Substring or set membership.
        Contains => "CONTAINS",
        /// Negated substring or set membership.
        NotContains => "NOT_CONTAINS",
        /// String prefix.
        BeginsWith => "BEGINS_WITH",
        /// Membership in a value list.
        In => "IN",
        /// Inclusive range.
        Between => "BETWEEN",
    }
}

wire_enum! {
    /// Action of a legacy `AttributeUpdates` entry.
    pub enum AttributeAction {
        /// Replace the attribute.
        Put => "PUT",
        /// Remove the attribute, or elements from a set.
        Delete => "DELETE",
        /// Add to a number or set.
        Add => "ADD",
    }
}

// ---------------------------------------------------------------------------
// Structs - Key Schema & Throughput
// ---------------------------------------------------------------------------

/// An element of a table or index key schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    /// The key attribute.
    pub attribute_name: String,
    /// `HASH` or `RANGE`.
    pub key_type: KeyType,
}

impl KeySchemaElement {
    /// A partition key element.
    #[must_use]
    pub fn hash(name: impl Into<String>) -> Self {
        Self {
            attribute_name: name.into(),
            key_type: KeyType::Hash,
        }
    }

    /// A sort key element.
    #[must_use]
    pub fn range(name: impl Into<String>) -> Self {
        Self {
            attribute_name: name.into(),
            key_type: KeyType::Range,
        }
    }
}

/// Declares the scalar type of a key attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    /// The attribute.
    pub attribute_name: String,
    /// Its scalar type.
    pub attribute_type: ScalarAttributeType,
}

impl AttributeDefinition {
    /// Creates a definition.
    #[must_use]
    pub fn new(name: impl Into<String>, attribute_type: ScalarAttributeType) -> Self {
        Self {
            attribute_name: name.into(),
            attribute_type,
        }
    }
}

/// Billing mode details on a described table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BillingModeSummary {
    /// The billing mode in effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_mode: Option<BillingMode>,
    /// When the table last switched to on-demand (epoch seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_to_pay_per_request_date_time: Option<f64>,
}

/// Requested read/write capacity for a table or index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughput {
    /// Strongly consistent reads per second.
    pub read_capacity_units: i64,
    /// Writes per second.
    pub write_capacity_units: i64,
}

/// Provisioned capacity as reported by `DescribeTable`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughputDescription {
    /// Read capacity units.
    #[serde(default)]
    pub read_capacity_units: i64,
    /// Write capacity units.
    #[serde(default)]
    pub write_capacity_units: i64,
    /// Decreases performed today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_decreases_today: Option<i64>,
    /// Last increase (epoch seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_increase_date_time: Option<f64>,
    /// Last decrease (epoch seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_decrease_date_time: Option<f64>,
}

// ---------------------------------------------------------------------------
// Structs - Secondary Indexes & Streams
// ---------------------------------------------------------------------------

/// Attributes copied from the base table into an index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Projection {
    /// Which attributes are projected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_type: Option<ProjectionType>,
    /// Extra attributes when `projection_type` is `INCLUDE`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_key_attributes: Vec<String>,
}

/// A global secondary index declared at table creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndex {
    /// Index name.
    pub index_name: String,
    /// Index key schema.
    pub key_schema: Vec<KeySchemaElement>,
    /// Projected attributes.
    pub projection: Projection,
    /// Capacity for `PROVISIONED` tables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
}

/// A global secondary index as reported by `DescribeTable`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndexDescription {
    /// Index name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    /// Index key schema.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_schema: Vec<KeySchemaElement>,
    /// Projected attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    /// Index status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_status: Option<IndexStatus>,
    /// Whether the index is backfilling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backfilling: Option<bool>,
    /// Provisioned capacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughputDescription>,
    /// Index size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_size_bytes: Option<i64>,
    /// Item count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
    /// Index ARN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_arn: Option<String>,
}

/// A local secondary index declared at table creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalSecondaryIndex {
    /// Index name.
    pub index_name: String,
    /// Index key schema; shares the table's partition key.
    pub key_schema: Vec<KeySchemaElement>,
    /// Projected attributes.
    pub projection: Projection,
}

/// A local secondary index as reported by `DescribeTable`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalSecondaryIndexDescription {
    /// Index name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    /// Index key schema.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_schema: Vec<KeySchemaElement>,
    /// Projected attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    /// Index size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_size_bytes: Option<i64>,
    /// Item count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
    /// Index ARN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_arn: Option<String>,
}

/// Stream settings of a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamSpecification {
    /// Whether the stream is enabled.
    pub stream_enabled: bool,
    /// What each record carries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_view_type: Option<StreamViewType>,
}

/// One entry of `UpdateTable`'s `GlobalSecondaryIndexUpdates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndexUpdate {
    /// Changes the capacity of an existing index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<UpdateGlobalSecondaryIndexAction>,
}

/// New capacity for an existing global secondary index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateGlobalSecondaryIndexAction {
    /// Index name.
    pub index_name: String,
    /// New capacity.
    pub provisioned_throughput: ProvisionedThroughput,
}

// ---------------------------------------------------------------------------
// Structs - Table Description
// ---------------------------------------------------------------------------

/// Description of a table, returned by the table lifecycle operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDescription {
    /// Table name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Table status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_status: Option<TableStatus>,
    /// Base table key schema.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_schema: Vec<KeySchemaElement>,
    /// Types of every key attribute of the table and its indexes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_definitions: Vec<AttributeDefinition>,
    /// Creation time (epoch seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<f64>,
    /// Approximate item count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
    /// Approximate size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_size_bytes: Option<i64>,
    /// Table ARN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_arn: Option<String>,
    /// Billing mode details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_mode_summary: Option<BillingModeSummary>,
    /// Provisioned capacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughputDescription>,
    /// Global secondary indexes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_secondary_indexes: Vec<GlobalSecondaryIndexDescription>,
    /// Local secondary indexes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_secondary_indexes: Vec<LocalSecondaryIndexDescription>,
    /// Stream settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_specification: Option<StreamSpecification>,
    /// Latest stream ARN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_stream_arn: Option<String>,
}

// ---------------------------------------------------------------------------
// Structs - Consumed Capacity & Metrics
// ---------------------------------------------------------------------------

/// Capacity consumed by one table or index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Capacity {
    /// Read units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<f64>,
    /// Write units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<f64>,
    /// Total units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
}

/// Capacity consumed by one request.
///
/// Present when `ReturnConsumedCapacity` is `TOTAL` or `INDEXES`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsumedCapacity {
    /// Table the capacity was charged to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Total units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
    /// Read units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<f64>,
    /// Write units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<f64>,
    /// Base table share.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Capacity>,
    /// Per local secondary index.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub local_secondary_indexes: HashMap<String, Capacity>,
    /// Per global secondary index.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub global_secondary_indexes: HashMap<String, Capacity>,
}

/// Size estimate of an item collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemCollectionMetrics {
    /// Partition key of the collection.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub item_collection_key: HashMap<String, AttributeValue>,
    /// Lower and upper size bound in gigabytes.
    #[serde(
        rename = "SizeEstimateRangeGB",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub size_estimate_range_gb: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Structs - Legacy conditions
// ---------------------------------------------------------------------------

/// One entry of a legacy `KeyConditions`, `QueryFilter` or `ScanFilter` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Condition {
    /// The comparison operator.
    pub comparison_operator: ComparisonOperator,
    /// Operands, in operator order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_value_list: Vec<AttributeValue>,
}

impl Condition {
    /// Creates a legacy condition entry.
    #[must_use]
    pub fn new(comparison_operator: ComparisonOperator, values: Vec<AttributeValue>) -> Self {
        Self {
            comparison_operator,
            attribute_value_list: values,
        }
    }
}

/// One entry of a legacy `AttributeUpdates` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeValueUpdate {
    /// Operand of the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
    /// Action; `PUT` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<AttributeAction>,
}

/// One entry of a legacy `Expected` map.
///
/// Either the simple form (`Value` and/or `Exists`) or the extended form
/// (`ComparisonOperator` with `AttributeValueList`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpectedAttributeValue {
    /// Value the attribute must equal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
    /// Whether the attribute must exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
    /// Extended form operator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_operator: Option<ComparisonOperator>,
    /// Extended form operands.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_value_list: Vec<AttributeValue>,
}

impl ExpectedAttributeValue {
    /// The attribute must (or must not) exist.
    #[must_use]
    pub fn exists(exists: bool) -> Self {
        Self {
            exists: Some(exists),
            ..Self::default()
        }
    }

    /// The attribute must equal `value`.
    #[must_use]
    pub fn equals(value: AttributeValue) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Structs - Batch Operations
// ---------------------------------------------------------------------------

/// Keys and projection for one table of a `BatchGetItem`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeysAndAttributes {
    /// Keys of the items to read.
    pub keys: Vec<Key>,
    /// Attributes to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    /// Name placeholders used by `projection_expression`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,
    /// Strongly consistent read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
}

/// A put or delete inside a `BatchWriteItem`.
///
/// Exactly one side is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteRequest {
    /// Item to put.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_request: Option<PutRequest>,
    /// Key to delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_request: Option<DeleteRequest>,
}

impl WriteRequest {
    /// A put of `item`.
    #[must_use]
    pub fn put(item: Item) -> Self {
        Self {
            put_request: Some(PutRequest { item }),
            delete_request: None,
        }
    }

    /// A delete of `key`.
    #[must_use]
    pub fn delete(key: Key) -> Self {
        Self {
            put_request: None,
            delete_request: Some(DeleteRequest { key }),
        }
    }
}

/// Put half of a [`WriteRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRequest {
    /// The full item.
    pub item: Item,
}

/// Delete half of a [`WriteRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRequest {
    /// The primary key.
    pub key: Key,
}

// ---------------------------------------------------------------------------
// Type aliases for common DynamoDB item shapes
// ---------------------------------------------------------------------------

/// An item: attribute names to values.
pub type Item = HashMap<String, AttributeValue>;

/// A primary key: key attribute names to values.
pub type Key = HashMap<String, AttributeValue>;
