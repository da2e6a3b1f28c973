//! Key metadata of one table, taken from `DescribeTable`.
//!
//! A [`TableDescriptor`] is owned by the connection that described the
//! table. Request builders read key names and key types from it; nothing
//! is cached process-wide.

use std::collections::HashMap;

use dynaccess_model::types::{
    KeySchemaElement, KeyType, ScalarAttributeType, TableDescription,
};
use dynaccess_model::{AttributeValue, Item, Key};

use crate::error::{ClientError, ClientResult};

/// Partition and optional sort key names of a table or index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNames {
    /// Partition key attribute.
    pub hash_key: String,
    /// Sort key attribute, if the schema has one.
    pub range_key: Option<String>,
}

impl KeyNames {
    fn from_schema(schema: &[KeySchemaElement]) -> Option<Self> {
        let hash_key = schema
            .iter()
            .find(|e| e.key_type == KeyType::Hash)?
            .attribute_name
            .clone();
        let range_key = schema
            .iter()
            .find(|e| e.key_type == KeyType::Range)
            .map(|e| e.attribute_name.clone());
        Some(Self {
            hash_key,
            range_key,
        })
    }

    /// Returns `true` if `name` is one of the two key attributes.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.hash_key == name || self.range_key.as_deref() == Some(name)
    }
}

/// Key schema, key attribute types and index key schemas of a table.
#[derive(Debug, Clone)]
pub struct TableDescriptor {
    table_name: String,
    keys: KeyNames,
    attribute_types: HashMap<String, ScalarAttributeType>,
    indexes: HashMap<String, KeyNames>,
}

impl TableDescriptor {
    /// Builds a descriptor from a `DescribeTable` result.
    pub fn from_description(description: &TableDescription) -> ClientResult<Self> {
        let table_name = description
            .table_name
            .clone()
            .ok_or_else(|| ClientError::validation("table description has no TableName"))?;
        let keys = KeyNames::from_schema(&description.key_schema).ok_or_else(|| {
            ClientError::validation(format!("table {table_name} has no HASH key in its schema"))
        })?;

        let attribute_types = description
            .attribute_definitions
            .iter()
            .map(|d| (d.attribute_name.clone(), d.attribute_type))
            .collect();

        let mut indexes = HashMap::new();
        let global = description
            .global_secondary_indexes
            .iter()
            .map(|i| (i.index_name.as_ref(), i.key_schema.as_slice()));
        let local = description
            .local_secondary_indexes
            .iter()
            .map(|i| (i.index_name.as_ref(), i.key_schema.as_slice()));
        for (name, schema) in global.chain(local) {
            if let (Some(name), Some(index_keys)) = (name, KeyNames::from_schema(schema)) {
                indexes.insert(name.clone(), index_keys);
            }
        }

        Ok(Self {
            table_name,
            keys,
            attribute_types,
            indexes,
        })
    }

    /// Table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Partition key of the base table.
    #[must_use]
    pub fn hash_key(&self) -> &str {
        &self.keys.hash_key
    }

    /// Sort key of the base table.
    #[must_use]
    pub fn range_key(&self) -> Option<&str> {
        self.keys.range_key.as_deref()
    }

    /// Key names of the base table.
    #[must_use]
    pub fn keys(&self) -> &KeyNames {
        &self.keys
    }

    /// Declared type of a key attribute of the table or any index.
    #[must_use]
    pub fn attribute_type(&self, name: &str) -> Option<ScalarAttributeType> {
        self.attribute_types.get(name).copied()
    }

    /// Key names of the base table, or of `index_name` when given.
    pub fn index_keys(&self, index_name: Option<&str>) -> ClientResult<&KeyNames> {
        match index_name {
            None => Ok(&self.keys),
            Some(name) => self.indexes.get(name).ok_or_else(|| {
                ClientError::validation(format!(
                    "table {} has no index named {name}",
                    self.table_name
                ))
            }),
        }
    }

    /// Returns `true` if `name` is a key attribute of the base table.
    #[must_use]
    pub fn is_key_attribute(&self, name: &str) -> bool {
        self.keys.contains(name)
    }

    /// Checks `value` against the declared type of key attribute `name`.
    pub fn check_key_type(&self, name: &str, value: &AttributeValue) -> ClientResult<()> {
        let Some(expected) = self.attribute_type(name) else {
            return Ok(());
        };
        if value.scalar_type() == Some(expected) {
            Ok(())
        } else {
            Err(ClientError::validation(format!(
                "key attribute {name} must be of type {expected}, got {}",
                value.type_descriptor()
            )))
        }
    }

    /// Builds the primary key from a partition value and optional sort value.
    pub fn build_key(
        &self,
        hash_value: AttributeValue,
        range_value: Option<AttributeValue>,
    ) -> ClientResult<Key> {
        let mut key = Key::with_capacity(2);
        self.check_key_type(self.hash_key(), &hash_value)?;
        key.insert(self.hash_key().to_owned(), hash_value);

        match (self.range_key(), range_value) {
            (Some(range_key), Some(value)) => {
                self.check_key_type(range_key, &value)?;
                key.insert(range_key.to_owned(), value);
            }
            (Some(range_key), None) => {
                return Err(ClientError::validation(format!(
                    "table {} requires a value for range key {range_key}",
                    self.table_name
                )));
            }
            (None, Some(_)) => {
                return Err(ClientError::validation(format!(
                    "table {} has no range key",
                    self.table_name
                )));
            }
            (None, None) => {}
        }
        Ok(key)
    }

    /// Checks that an item or key map carries every base table key.
    pub fn check_item_keys(&self, item: &Item) -> ClientResult<()> {
        let names = std::iter::once(self.hash_key()).chain(self.range_key());
        for name in names {
            let value = item.get(name).ok_or_else(|| {
                ClientError::validation(format!("missing key attribute {name}"))
            })?;
            self.check_key_type(name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::describe_table_fixture;

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_owned())
    }

    #[test]
    fn test_should_read_keys_from_description() {
        let table = TableDescriptor::from_description(&describe_table_fixture()).unwrap();
        assert_eq!(table.table_name(), "ci-table");
        assert_eq!(table.hash_key(), "ForumName");
        assert_eq!(table.range_key(), Some("Subject"));
        assert_eq!(
            table.attribute_type("LastPostDateTime"),
            Some(ScalarAttributeType::S)
        );

        let index = table.index_keys(Some("LastPostIndex")).unwrap();
        assert_eq!(index.hash_key, "ForumName");
        assert_eq!(index.range_key.as_deref(), Some("LastPostDateTime"));
        assert!(table.index_keys(Some("missing")).is_err());
    }

    #[test]
    fn test_should_build_key_with_range() {
        let table = TableDescriptor::from_description(&describe_table_fixture()).unwrap();
        let key = table.build_key(s("Amazon"), Some(s("thread"))).unwrap();
        assert_eq!(key.len(), 2);
        assert_eq!(key["Subject"], s("thread"));
    }

    #[test]
    fn test_should_require_declared_range_key() {
        let table = TableDescriptor::from_description(&describe_table_fixture()).unwrap();
        let err = table.build_key(s("Amazon"), None).unwrap_err();
        assert!(err.to_string().contains("range key Subject"));
    }

    #[test]
    fn test_should_reject_mistyped_key() {
        let table = TableDescriptor::from_description(&describe_table_fixture()).unwrap();
        let err = table
            .build_key(AttributeValue::from(7), Some(s("thread")))
            .unwrap_err();
        assert!(err.to_string().contains("must be of type S"));
    }

    #[test]
    fn test_should_reject_undeclared_range_key() {
        let mut description = describe_table_fixture();
        description.key_schema.retain(|e| e.key_type == KeyType::Hash);
        let table = TableDescriptor::from_description(&description).unwrap();
        assert!(table.build_key(s("Amazon"), Some(s("x"))).is_err());
        assert_eq!(table.build_key(s("Amazon"), None).unwrap().len(), 1);
    }

    #[test]
    fn test_should_check_item_keys() {
        let table = TableDescriptor::from_description(&describe_table_fixture()).unwrap();
        let item = Item::from([("ForumName".to_owned(), s("Foo"))]);
        assert!(table.check_item_keys(&item).is_err());
    }
}
