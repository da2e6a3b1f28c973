//! Per-operation request builders.
//!
//! Each builder validates its arguments, compiles every expression of the
//! request into one shared [`PlaceholderTable`] and returns the typed input
//! ready to serialize. Builders never touch the network, so every
//! validation failure happens before a request is sent.
//!
//! Expressions of one request are compiled in a fixed order so placeholders
//! are numbered reproducibly:
//!
//! | Operation | Order |
//! |-----------|-------|
//! | `PutItem`, `DeleteItem` | condition |
//! | `UpdateItem` | condition, update |
//! | `GetItem`, `BatchGetItem` | projection |
//! | `Query` | key condition, filter, projection |
//! | `Scan` | filter, projection |

use std::collections::HashMap;

use dynaccess_model::input::{
    BatchGetItemInput, BatchWriteItemInput, CreateTableInput, DeleteItemInput, DeleteTableInput,
    DescribeTableInput, GetItemInput, PutItemInput, QueryInput, ScanInput, UpdateItemInput,
    UpdateTableInput,
};
use dynaccess_model::types::{
    AttributeDefinition, AttributeValueUpdate, BillingMode, Condition as LegacyCondition,
    ConditionalOperator, ExpectedAttributeValue, GlobalSecondaryIndex, GlobalSecondaryIndexUpdate,
    KeySchemaElement, KeysAndAttributes, LocalSecondaryIndex, ProvisionedThroughput,
    ReturnConsumedCapacity, ReturnItemCollectionMetrics, ReturnValue, Select,
    StreamSpecification, UpdateGlobalSecondaryIndexAction, WriteRequest,
};
use dynaccess_model::{AttributeValue, Item, Key};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::expression::{
    Condition, Path, PlaceholderTable, UpdateAction, compile_condition, compile_key_condition,
    compile_projection, compile_update, legacy,
};
use crate::table::{KeyNames, TableDescriptor};

/// Most writes one `BatchWriteItem` call may carry.
pub const MAX_BATCH_WRITE_ITEMS: usize = 25;

/// Most keys one `BatchGetItem` call may carry.
pub const MAX_BATCH_GET_KEYS: usize = 100;

/// Largest accepted `TotalSegments`.
const MAX_TOTAL_SEGMENTS: u32 = 1_000_000;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Arguments of `CreateTable`.
#[derive(Debug, Clone, Default)]
pub struct CreateTableOptions {
    /// Types of every key attribute of the table and its indexes.
    pub attribute_definitions: Vec<AttributeDefinition>,
    /// Base table key schema.
    pub key_schema: Vec<KeySchemaElement>,
    /// Provisioned read units; requires `write_capacity_units`.
    pub read_capacity_units: Option<i64>,
    /// Provisioned write units; requires `read_capacity_units`.
    pub write_capacity_units: Option<i64>,
    pub billing_mode: Option<BillingMode>,
    pub global_secondary_indexes: Vec<GlobalSecondaryIndex>,
    pub local_secondary_indexes: Vec<LocalSecondaryIndex>,
    pub stream_specification: Option<StreamSpecification>,
}

/// New capacity for one global secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexThroughputUpdate {
    pub index_name: String,
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

/// Arguments of `UpdateTable`.
#[derive(Debug, Clone, Default)]
pub struct UpdateTableOptions {
    /// New read units; requires `write_capacity_units`.
    pub read_capacity_units: Option<i64>,
    /// New write units; requires `read_capacity_units`.
    pub write_capacity_units: Option<i64>,
    pub billing_mode: Option<BillingMode>,
    pub global_secondary_index_updates: Vec<IndexThroughputUpdate>,
}

/// Arguments of `GetItem`.
#[derive(Debug, Clone, Default)]
pub struct GetItemOptions {
    pub consistent_read: Option<bool>,
    /// Document paths to return; everything when empty.
    pub attributes_to_get: Vec<String>,
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

/// Arguments of `PutItem`.
#[derive(Debug, Clone, Default)]
pub struct PutItemOptions {
    pub condition: Option<Condition>,
    /// Legacy form of `condition`.
    pub expected: HashMap<String, ExpectedAttributeValue>,
    /// Joins the `expected` entries; `AND` when absent.
    pub conditional_operator: Option<ConditionalOperator>,
    pub return_values: Option<ReturnValue>,
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

/// Arguments of `UpdateItem`.
#[derive(Debug, Clone, Default)]
pub struct UpdateItemOptions {
    pub actions: Vec<UpdateAction>,
    /// Legacy form of `actions`.
    pub attribute_updates: HashMap<String, AttributeValueUpdate>,
    pub condition: Option<Condition>,
    pub expected: HashMap<String, ExpectedAttributeValue>,
    pub conditional_operator: Option<ConditionalOperator>,
    pub return_values: Option<ReturnValue>,
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

/// Arguments of `DeleteItem`.
#[derive(Debug, Clone, Default)]
pub struct DeleteItemOptions {
    pub condition: Option<Condition>,
    pub expected: HashMap<String, ExpectedAttributeValue>,
    pub conditional_operator: Option<ConditionalOperator>,
    pub return_values: Option<ReturnValue>,
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

/// Arguments of `Query`; the partition key value is passed separately.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Sort key condition. A condition that does not constrain the sort key
    /// is used as the filter when no filter is given.
    pub range_key_condition: Option<Condition>,
    pub filter_condition: Option<Condition>,
    /// Legacy form of `range_key_condition`, keyed by the sort key name.
    pub key_conditions: HashMap<String, LegacyCondition>,
    /// Legacy form of `filter_condition`.
    pub query_filter: HashMap<String, LegacyCondition>,
    /// Joins the `query_filter` entries; `AND` when absent.
    pub conditional_operator: Option<ConditionalOperator>,
    pub attributes_to_get: Vec<String>,
    pub consistent_read: Option<bool>,
    pub exclusive_start_key: Option<Key>,
    pub index_name: Option<String>,
    pub limit: Option<u32>,
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
    pub scan_index_forward: Option<bool>,
    pub select: Option<Select>,
}

/// Arguments of `Scan`.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub filter_condition: Option<Condition>,
    /// Legacy form of `filter_condition`.
    pub scan_filter: HashMap<String, LegacyCondition>,
    /// Joins the `scan_filter` entries; `AND` when absent.
    pub conditional_operator: Option<ConditionalOperator>,
    pub attributes_to_get: Vec<String>,
    pub limit: Option<u32>,
    /// Zero-based segment of a parallel scan; requires `total_segments`.
    pub segment: Option<u32>,
    pub total_segments: Option<u32>,
    pub exclusive_start_key: Option<Key>,
    pub consistent_read: Option<bool>,
    pub index_name: Option<String>,
    pub select: Option<Select>,
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

/// Arguments of `BatchGetItem`.
#[derive(Debug, Clone, Default)]
pub struct BatchGetOptions {
    pub consistent_read: Option<bool>,
    pub attributes_to_get: Vec<String>,
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

/// Arguments of `BatchWriteItem`.
#[derive(Debug, Clone, Default)]
pub struct BatchWriteOptions {
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

// ---------------------------------------------------------------------------
// Table lifecycle
// ---------------------------------------------------------------------------

/// Builds `CreateTable`.
pub fn build_create_table(
    table_name: &str,
    options: CreateTableOptions,
) -> ClientResult<CreateTableInput> {
    if options.attribute_definitions.is_empty() {
        return Err(ClientError::validation(
            "attribute_definitions argument is required",
        ));
    }
    if options.key_schema.is_empty() {
        return Err(ClientError::validation("key_schema argument is required"));
    }
    let provisioned_throughput =
        throughput(options.read_capacity_units, options.write_capacity_units)?;
    if options.billing_mode == Some(BillingMode::PayPerRequest) && provisioned_throughput.is_some()
    {
        return Err(ClientError::validation(
            "provisioned throughput cannot be set with PAY_PER_REQUEST billing",
        ));
    }

    Ok(CreateTableInput {
        table_name: table_name.to_owned(),
        key_schema: options.key_schema,
        attribute_definitions: options.attribute_definitions,
        billing_mode: options.billing_mode,
        provisioned_throughput,
        global_secondary_indexes: options.global_secondary_indexes,
        local_secondary_indexes: options.local_secondary_indexes,
        stream_specification: options.stream_specification,
    })
}

/// Builds `DeleteTable`.
#[must_use]
pub fn build_delete_table(table_name: &str) -> DeleteTableInput {
    DeleteTableInput {
        table_name: table_name.to_owned(),
    }
}

/// Builds `DescribeTable`.
#[must_use]
pub fn build_describe_table(table_name: &str) -> DescribeTableInput {
    DescribeTableInput {
        table_name: table_name.to_owned(),
    }
}

/// Builds `UpdateTable`.
pub fn build_update_table(
    table_name: &str,
    options: UpdateTableOptions,
) -> ClientResult<UpdateTableInput> {
    let provisioned_throughput =
        throughput(options.read_capacity_units, options.write_capacity_units)?;
    if provisioned_throughput.is_none()
        && options.billing_mode.is_none()
        && options.global_secondary_index_updates.is_empty()
    {
        return Err(ClientError::validation(
            "update_table requires throughput, billing mode or index updates",
        ));
    }

    let global_secondary_index_updates = options
        .global_secondary_index_updates
        .into_iter()
        .map(|u| GlobalSecondaryIndexUpdate {
            update: Some(UpdateGlobalSecondaryIndexAction {
                index_name: u.index_name,
                provisioned_throughput: ProvisionedThroughput {
                    read_capacity_units: u.read_capacity_units,
                    write_capacity_units: u.write_capacity_units,
                },
            }),
        })
        .collect();

    Ok(UpdateTableInput {
        table_name: table_name.to_owned(),
        provisioned_throughput,
        billing_mode: options.billing_mode,
        global_secondary_index_updates,
    })
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Builds `GetItem`.
pub fn build_get_item(
    table: &TableDescriptor,
    hash_key: AttributeValue,
    range_key: Option<AttributeValue>,
    options: GetItemOptions,
) -> ClientResult<GetItemInput> {
    let key = table.build_key(hash_key, range_key)?;
    let mut placeholders = PlaceholderTable::new();
    let projection_expression = projection(&options.attributes_to_get, &mut placeholders)?;
    let (expression_attribute_names, _) = placeholders.into_maps();

    Ok(GetItemInput {
        table_name: table.table_name().to_owned(),
        key,
        consistent_read: options.consistent_read,
        projection_expression,
        expression_attribute_names,
        return_consumed_capacity: options.return_consumed_capacity,
    })
}

/// Builds `PutItem`. The item is the key merged with `attributes`; a key
/// attribute present in `attributes` wins.
pub fn build_put_item(
    table: &TableDescriptor,
    config: &ClientConfig,
    hash_key: AttributeValue,
    range_key: Option<AttributeValue>,
    attributes: Item,
    options: PutItemOptions,
) -> ClientResult<PutItemInput> {
    let mut item = table.build_key(hash_key, range_key)?;
    item.extend(attributes);

    let condition = resolve_condition(
        options.condition,
        &options.expected,
        options.conditional_operator,
    )?;
    let mut placeholders = PlaceholderTable::new();
    let condition_expression = compile_optional(condition.as_ref(), &mut placeholders)?;
    let (expression_attribute_names, expression_attribute_values) = placeholders.into_maps();

    Ok(PutItemInput {
        table_name: table.table_name().to_owned(),
        item,
        condition_expression,
        expression_attribute_names,
        expression_attribute_values,
        return_values: options.return_values,
        return_consumed_capacity: consumed_capacity(config, options.return_consumed_capacity),
        return_item_collection_metrics: options.return_item_collection_metrics,
    })
}

/// Builds `UpdateItem`.
pub fn build_update_item(
    table: &TableDescriptor,
    config: &ClientConfig,
    hash_key: AttributeValue,
    range_key: Option<AttributeValue>,
    options: UpdateItemOptions,
) -> ClientResult<UpdateItemInput> {
    let key = table.build_key(hash_key, range_key)?;

    if !options.actions.is_empty() && !options.attribute_updates.is_empty() {
        return Err(ClientError::validation(
            "actions and attribute_updates are mutually exclusive",
        ));
    }
    let actions = if options.attribute_updates.is_empty() {
        options.actions
    } else {
        legacy::actions_from_attribute_updates(&options.attribute_updates)?
    };
    let condition = resolve_condition(
        options.condition,
        &options.expected,
        options.conditional_operator,
    )?;
    let mut placeholders = PlaceholderTable::new();
    let condition_expression = compile_optional(condition.as_ref(), &mut placeholders)?;
    let update_expression = compile_update(&actions, &mut placeholders)?;
    let (expression_attribute_names, expression_attribute_values) = placeholders.into_maps();

    Ok(UpdateItemInput {
        table_name: table.table_name().to_owned(),
        key,
        update_expression: Some(update_expression),
        condition_expression,
        expression_attribute_names,
        expression_attribute_values,
        return_values: options.return_values,
        return_consumed_capacity: consumed_capacity(config, options.return_consumed_capacity),
        return_item_collection_metrics: options.return_item_collection_metrics,
    })
}

/// Builds `DeleteItem`.
pub fn build_delete_item(
    table: &TableDescriptor,
    config: &ClientConfig,
    hash_key: AttributeValue,
    range_key: Option<AttributeValue>,
    options: DeleteItemOptions,
) -> ClientResult<DeleteItemInput> {
    let key = table.build_key(hash_key, range_key)?;
    let condition = resolve_condition(
        options.condition,
        &options.expected,
        options.conditional_operator,
    )?;
    let mut placeholders = PlaceholderTable::new();
    let condition_expression = compile_optional(condition.as_ref(), &mut placeholders)?;
    let (expression_attribute_names, expression_attribute_values) = placeholders.into_maps();

    Ok(DeleteItemInput {
        table_name: table.table_name().to_owned(),
        key,
        condition_expression,
        expression_attribute_names,
        expression_attribute_values,
        return_values: options.return_values,
        return_consumed_capacity: consumed_capacity(config, options.return_consumed_capacity),
        return_item_collection_metrics: options.return_item_collection_metrics,
    })
}

// ---------------------------------------------------------------------------
// Query & Scan
// ---------------------------------------------------------------------------

/// Builds `Query` for the partition `hash_key` of the table or index.
pub fn build_query(
    table: &TableDescriptor,
    config: &ClientConfig,
    hash_key: AttributeValue,
    options: QueryOptions,
) -> ClientResult<QueryInput> {
    let keys = table.index_keys(options.index_name.as_deref())?;
    table.check_key_type(&keys.hash_key, &hash_key)?;

    if options.range_key_condition.is_some() && !options.key_conditions.is_empty() {
        return Err(ClientError::validation(
            "range_key_condition and key_conditions are mutually exclusive",
        ));
    }
    if options.filter_condition.is_some() && !options.query_filter.is_empty() {
        return Err(ClientError::validation(
            "filter_condition and query_filter are mutually exclusive",
        ));
    }
    if options.conditional_operator.is_some() && options.query_filter.is_empty() {
        return Err(ClientError::validation(
            "ConditionalOperator cannot be used without QueryFilter",
        ));
    }
    validate_select(
        options.select,
        !options.attributes_to_get.is_empty(),
        options.index_name.is_some(),
    )?;

    let mut filter = match options.filter_condition {
        Some(filter) => Some(filter),
        None => legacy::condition_from_filter(&options.query_filter, options.conditional_operator)?,
    };

    let range_key = keys.range_key.as_deref();
    let sort = match options.range_key_condition {
        Some(condition)
            if range_key.is_some_and(|name| condition.is_valid_range_key_condition(name)) =>
        {
            Some(condition)
        }
        Some(condition) if filter.is_none() => {
            filter = Some(condition);
            None
        }
        Some(_) => {
            return Err(ClientError::validation(format!(
                "range_key_condition is not a valid condition on range key {}",
                range_key.unwrap_or("(none)")
            )));
        }
        None => legacy_sort_condition(&options.key_conditions, keys)?,
    };

    if let Some(filter) = &filter {
        validate_filter_no_key_attrs(filter, keys)?;
    }

    let partition = Path::new(keys.hash_key.as_str()).equals(hash_key);
    let mut placeholders = PlaceholderTable::new();
    let key_condition_expression =
        compile_key_condition(&partition, sort.as_ref(), &mut placeholders)?;
    let filter_expression = compile_optional(filter.as_ref(), &mut placeholders)?;
    let projection_expression = projection(&options.attributes_to_get, &mut placeholders)?;
    let (expression_attribute_names, expression_attribute_values) = placeholders.into_maps();

    Ok(QueryInput {
        table_name: table.table_name().to_owned(),
        index_name: options.index_name,
        key_condition_expression: Some(key_condition_expression),
        filter_expression,
        projection_expression,
        expression_attribute_names,
        expression_attribute_values,
        scan_index_forward: options.scan_index_forward,
        limit: to_i32_limit(options.limit)?,
        exclusive_start_key: options.exclusive_start_key.unwrap_or_default(),
        select: options.select,
        consistent_read: options.consistent_read,
        return_consumed_capacity: consumed_capacity(config, options.return_consumed_capacity),
    })
}

/// Builds one `Scan` page request.
pub fn build_scan(
    table: &TableDescriptor,
    config: &ClientConfig,
    options: ScanOptions,
) -> ClientResult<ScanInput> {
    if let Some(index_name) = options.index_name.as_deref() {
        table.index_keys(Some(index_name))?;
    }
    if options.filter_condition.is_some() && !options.scan_filter.is_empty() {
        return Err(ClientError::validation(
            "filter_condition and scan_filter are mutually exclusive",
        ));
    }
    if options.conditional_operator.is_some() && options.scan_filter.is_empty() {
        return Err(ClientError::validation(
            "ConditionalOperator cannot be used without ScanFilter",
        ));
    }
    let (segment, total_segments) =
        validate_parallel_scan(options.segment, options.total_segments)?;
    validate_select(
        options.select,
        !options.attributes_to_get.is_empty(),
        options.index_name.is_some(),
    )?;

    let filter = match options.filter_condition {
        Some(filter) => Some(filter),
        None => legacy::condition_from_filter(&options.scan_filter, options.conditional_operator)?,
    };

    let mut placeholders = PlaceholderTable::new();
    let filter_expression = compile_optional(filter.as_ref(), &mut placeholders)?;
    let projection_expression = projection(&options.attributes_to_get, &mut placeholders)?;
    let (expression_attribute_names, expression_attribute_values) = placeholders.into_maps();

    Ok(ScanInput {
        table_name: table.table_name().to_owned(),
        index_name: options.index_name,
        filter_expression,
        projection_expression,
        expression_attribute_names,
        expression_attribute_values,
        limit: to_i32_limit(options.limit)?,
        exclusive_start_key: options.exclusive_start_key.unwrap_or_default(),
        segment,
        total_segments,
        select: options.select,
        consistent_read: options.consistent_read,
        return_consumed_capacity: consumed_capacity(config, options.return_consumed_capacity),
    })
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

/// Builds `BatchGetItem` calls of at most [`MAX_BATCH_GET_KEYS`] keys each.
pub fn build_batch_get(
    table: &TableDescriptor,
    config: &ClientConfig,
    keys: Vec<Key>,
    options: BatchGetOptions,
) -> ClientResult<Vec<BatchGetItemInput>> {
    if keys.is_empty() {
        return Err(ClientError::validation("batch_get_item requires at least one key"));
    }
    for key in &keys {
        table.check_item_keys(key)?;
    }

    let mut placeholders = PlaceholderTable::new();
    let projection_expression = projection(&options.attributes_to_get, &mut placeholders)?;
    let (expression_attribute_names, _) = placeholders.into_maps();
    let return_consumed_capacity = consumed_capacity(config, options.return_consumed_capacity);

    Ok(into_chunks(keys, MAX_BATCH_GET_KEYS)
        .into_iter()
        .map(|chunk| {
            let request = KeysAndAttributes {
                keys: chunk,
                projection_expression: projection_expression.clone(),
                expression_attribute_names: expression_attribute_names.clone(),
                consistent_read: options.consistent_read,
            };
            BatchGetItemInput {
                request_items: HashMap::from([(table.table_name().to_owned(), request)]),
                return_consumed_capacity,
            }
        })
        .collect())
}

/// Builds `BatchWriteItem` calls of at most [`MAX_BATCH_WRITE_ITEMS`]
/// writes each. Puts come before deletes.
pub fn build_batch_write(
    table: &TableDescriptor,
    config: &ClientConfig,
    put_items: Vec<Item>,
    delete_keys: Vec<Key>,
    options: BatchWriteOptions,
) -> ClientResult<Vec<BatchWriteItemInput>> {
    if put_items.is_empty() && delete_keys.is_empty() {
        return Err(ClientError::validation(
            "batch_write_item requires put_items or delete_items",
        ));
    }
    for item in put_items.iter().chain(&delete_keys) {
        table.check_item_keys(item)?;
    }

    let writes: Vec<WriteRequest> = put_items
        .into_iter()
        .map(WriteRequest::put)
        .chain(delete_keys.into_iter().map(WriteRequest::delete))
        .collect();
    let return_consumed_capacity = consumed_capacity(config, options.return_consumed_capacity);

    Ok(into_chunks(writes, MAX_BATCH_WRITE_ITEMS)
        .into_iter()
        .map(|chunk| BatchWriteItemInput {
            request_items: HashMap::from([(table.table_name().to_owned(), chunk)]),
            return_consumed_capacity,
            return_item_collection_metrics: options.return_item_collection_metrics,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn consumed_capacity(
    config: &ClientConfig,
    requested: Option<ReturnConsumedCapacity>,
) -> Option<ReturnConsumedCapacity> {
    Some(requested.unwrap_or(config.return_consumed_capacity))
}

fn throughput(read: Option<i64>, write: Option<i64>) -> ClientResult<Option<ProvisionedThroughput>> {
    match (read, write) {
        (Some(read_capacity_units), Some(write_capacity_units)) => Ok(Some(ProvisionedThroughput {
            read_capacity_units,
            write_capacity_units,
        })),
        (None, None) => Ok(None),
        _ => Err(ClientError::validation(
            "read_capacity_units and write_capacity_units must be given together",
        )),
    }
}

/// Picks the condition from either the expression or the legacy `Expected`
/// form; never both.
fn resolve_condition(
    condition: Option<Condition>,
    expected: &HashMap<String, ExpectedAttributeValue>,
    conditional_operator: Option<ConditionalOperator>,
) -> ClientResult<Option<Condition>> {
    if conditional_operator.is_some() && expected.is_empty() {
        return Err(ClientError::validation(
            "ConditionalOperator cannot be used without Expected or with an empty Expected map",
        ));
    }
    match condition {
        Some(_) if !expected.is_empty() => Err(ClientError::validation(
            "condition and expected are mutually exclusive",
        )),
        Some(condition) => Ok(Some(condition)),
        None => Ok(legacy::condition_from_expected(
            expected,
            conditional_operator,
        )?),
    }
}

fn legacy_sort_condition(
    key_conditions: &HashMap<String, LegacyCondition>,
    keys: &KeyNames,
) -> ClientResult<Option<Condition>> {
    let mut sort = None;
    for (name, entry) in key_conditions {
        if keys.range_key.as_deref() != Some(name.as_str()) {
            return Err(ClientError::validation(format!(
                "key_conditions may only constrain the range key, got {name}"
            )));
        }
        sort = Some(legacy::key_condition_from_legacy(name, entry)?);
    }
    Ok(sort)
}

fn compile_optional(
    condition: Option<&Condition>,
    placeholders: &mut PlaceholderTable,
) -> ClientResult<Option<String>> {
    condition
        .map(|c| compile_condition(c, placeholders))
        .transpose()
        .map_err(ClientError::from)
}

fn projection(
    attributes: &[String],
    placeholders: &mut PlaceholderTable,
) -> ClientResult<Option<String>> {
    if attributes.is_empty() {
        return Ok(None);
    }
    let paths = attributes
        .iter()
        .map(|a| Path::parse(a))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(compile_projection(&paths, placeholders)))
}

/// Validate the `Select` parameter against the requested projection.
fn validate_select(
    select: Option<Select>,
    has_projection: bool,
    has_index: bool,
) -> ClientResult<()> {
    match select {
        Some(Select::AllProjectedAttributes) if !has_index => Err(ClientError::validation(
            "ALL_PROJECTED_ATTRIBUTES is only supported for secondary indexes",
        )),
        Some(Select::SpecificAttributes) if !has_projection => Err(ClientError::validation(
            "SPECIFIC_ATTRIBUTES requires attributes_to_get",
        )),
        Some(sel @ (Select::AllAttributes | Select::AllProjectedAttributes | Select::Count))
            if has_projection =>
        {
            Err(ClientError::validation(format!(
                "Cannot specify attributes_to_get when choosing to get {} results",
                sel.as_str()
            )))
        }
        _ => Ok(()),
    }
}

/// Validate `Segment` / `TotalSegments` and convert them to wire integers.
fn validate_parallel_scan(
    segment: Option<u32>,
    total_segments: Option<u32>,
) -> ClientResult<(Option<i32>, Option<i32>)> {
    match (segment, total_segments) {
        (Some(segment), Some(total)) => {
            if total == 0 || total > MAX_TOTAL_SEGMENTS {
                return Err(ClientError::validation(format!(
                    "total_segments must be between 1 and {MAX_TOTAL_SEGMENTS}, got {total}"
                )));
            }
            if segment >= total {
                return Err(ClientError::validation(format!(
                    "segment is zero-indexed and must be less than total_segments. \
                     Segment: {segment}, TotalSegments: {total}"
                )));
            }
            // Both bounded by MAX_TOTAL_SEGMENTS above.
            #[allow(clippy::cast_possible_wrap)]
            let (segment, total) = (segment as i32, total as i32);
            Ok((Some(segment), Some(total)))
        }
        (None, None) => Ok((None, None)),
        _ => Err(ClientError::validation(
            "segment and total_segments must be given together",
        )),
    }
}

/// Validate that a query filter does not reference the key attributes
/// being queried; those belong in the key condition.
fn validate_filter_no_key_attrs(filter: &Condition, keys: &KeyNames) -> ClientResult<()> {
    let mut names: Vec<String> = filter.referenced_attributes().into_iter().collect();
    names.sort();
    match names.into_iter().find(|name| keys.contains(name)) {
        Some(name) => Err(ClientError::validation(format!(
            "Filter Expression can not contain key attribute {name}"
        ))),
        None => Ok(()),
    }
}

fn to_i32_limit(limit: Option<u32>) -> ClientResult<Option<i32>> {
    limit
        .map(|l| {
            i32::try_from(l).map_err(|_| ClientError::validation(format!("limit {l} is too large")))
        })
        .transpose()
}

fn into_chunks<T>(mut items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let mut chunks = Vec::with_capacity(items.len().div_ceil(size));
    while items.len() > size {
        let rest = items.split_off(size);
        chunks.push(std::mem::replace(&mut items, rest));
    }
    if !items.is_empty() {
        chunks.push(items);
    }
    chunks
}
