//! Placeholder interning for attribute names and values.
//!
//! Names map to `#0`, `#1`, ... and are deduplicated by exact name. Values
//! map to `:0`, `:1`, ... and every interned value takes a fresh token, so
//! `5` and `"5"` can never collapse into one placeholder.

use std::collections::HashMap;

use dynaccess_model::AttributeValue;

/// Symbol table shared by every expression of one request.
#[derive(Debug, Default, Clone)]
pub struct PlaceholderTable {
    names: Vec<String>,
    name_tokens: HashMap<String, usize>,
    values: Vec<AttributeValue>,
}

impl PlaceholderTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the `#N` token for `name`, assigning the next index on first use.
    pub fn intern_name(&mut self, name: &str) -> String {
        let index = match self.name_tokens.get(name) {
            Some(index) => *index,
            None => {
                let index = self.names.len();
                self.names.push(name.to_owned());
                self.name_tokens.insert(name.to_owned(), index);
                index
            }
        };
        format!("#{index}")
    }

    /// Returns a new `:N` token bound to `value`.
    pub fn intern_value(&mut self, value: AttributeValue) -> String {
        let index = self.values.len();
        self.values.push(value);
        format!(":{index}")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.values.is_empty()
    }

    /// Token to attribute name, as sent in `ExpressionAttributeNames`.
    #[must_use]
    pub fn attribute_names(&self) -> HashMap<String, String> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (format!("#{i}"), name.clone()))
            .collect()
    }

    /// Token to value, as sent in `ExpressionAttributeValues`.
    #[must_use]
    pub fn attribute_values(&self) -> HashMap<String, AttributeValue> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| (format!(":{i}"), value.clone()))
            .collect()
    }

    /// Consumes the table into its two wire maps.
    #[must_use]
    pub fn into_maps(self) -> (HashMap<String, String>, HashMap<String, AttributeValue>) {
        let names = self
            .names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (format!("#{i}"), name))
            .collect();
        let values = self
            .values
            .into_iter()
            .enumerate()
            .map(|(i, value)| (format!(":{i}"), value))
            .collect();
        (names, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_reuse_name_tokens() {
        let mut table = PlaceholderTable::new();
        assert_eq!(table.intern_name("ForumName"), "#0");
        assert_eq!(table.intern_name("Subject"), "#1");
        assert_eq!(table.intern_name("ForumName"), "#0");
        assert_eq!(table.attribute_names().len(), 2);
    }

    #[test]
    fn test_should_assign_fresh_value_tokens() {
        let mut table = PlaceholderTable::new();
        assert_eq!(table.intern_value(AttributeValue::from("FooForum")), ":0");
        assert_eq!(table.intern_value(AttributeValue::from("FooForum")), ":1");
        assert_eq!(table.intern_value(AttributeValue::from(5)), ":2");

        let (_, values) = table.into_maps();
        assert_eq!(values[":2"], AttributeValue::N("5".to_owned()));
    }

    #[test]
    fn test_should_number_names_and_values_independently() {
        let mut table = PlaceholderTable::new();
        assert_eq!(table.intern_value(AttributeValue::Bool(true)), ":0");
        assert_eq!(table.intern_name("Flag"), "#0");
        assert!(!table.is_empty());
    }
}
