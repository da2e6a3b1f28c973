//! DynamoDB `AttributeValue` and its JSON wire representation.
//!
//! Every value travels as a single-key object whose key is the type tag,
//! e.g. `{"S": "hello"}` or `{"NS": ["1", "2"]}`. Binary payloads are
//! base64-encoded on the wire and held as raw bytes in memory.

use std::collections::HashMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::ScalarAttributeType;

/// Wire type tags, in the order the service documents them.
pub const TYPE_TAGS: &[&str] = &["S", "N", "B", "SS", "NS", "BS", "BOOL", "NULL", "L", "M"];

/// A DynamoDB attribute value.
///
/// Numbers stay string-encoded so no precision is lost between the caller
/// and the service.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// String.
    S(String),
    /// Number, string-encoded.
    N(String),
    /// Binary.
    B(Bytes),
    /// String set.
    Ss(Vec<String>),
    /// Number set, string-encoded.
    Ns(Vec<String>),
    /// Binary set.
    Bs(Vec<Bytes>),
    /// Boolean.
    Bool(bool),
    /// Null marker. The service only ever sends `true`.
    Null(bool),
    /// Ordered list of values.
    L(Vec<AttributeValue>),
    /// Nested map of values.
    M(HashMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Returns the wire type tag (`"S"`, `"N"`, `"BOOL"`, ...).
    #[must_use]
    pub fn type_descriptor(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::B(_) => "B",
            Self::Ss(_) => "SS",
            Self::Ns(_) => "NS",
            Self::Bs(_) => "BS",
            Self::Bool(_) => "BOOL",
            Self::Null(_) => "NULL",
            Self::L(_) => "L",
            Self::M(_) => "M",
        }
    }

    /// The scalar key type of this value, if it can be used as a key.
    #[must_use]
    pub fn scalar_type(&self) -> Option<ScalarAttributeType> {
        match self {
            Self::S(_) => Some(ScalarAttributeType::S),
            Self::N(_) => Some(ScalarAttributeType::N),
            Self::B(_) => Some(ScalarAttributeType::B),
            _ => None,
        }
    }

    /// Returns `true` for the `NULL` marker.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null(true))
    }

    /// Returns the string if this is an `S` value.
    #[must_use]
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number literal if this is an `N` value.
    #[must_use]
    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the bytes if this is a `B` value.
    #[must_use]
    pub fn as_b(&self) -> Option<&Bytes> {
        match self {
            Self::B(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `BOOL` value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the elements if this is an `L` value.
    #[must_use]
    pub fn as_l(&self) -> Option<&[AttributeValue]> {
        match self {
            Self::L(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the entries if this is an `M` value.
    #[must_use]
    pub fn as_m(&self) -> Option<&HashMap<String, AttributeValue>> {
        match self {
            Self::M(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S(s) => write!(f, "{{S: {s}}}"),
            Self::N(n) => write!(f, "{{N: {n}}}"),
            Self::B(b) => write!(f, "{{B: {} bytes}}", b.len()),
            Self::Ss(v) => write!(f, "{{SS: {v:?}}}"),
            Self::Ns(v) => write!(f, "{{NS: {v:?}}}"),
            Self::Bs(v) => write!(f, "{{BS: {} items}}", v.len()),
            Self::Bool(b) => write!(f, "{{BOOL: {b}}}"),
            Self::Null(b) => write!(f, "{{NULL: {b}}}"),
            Self::L(v) => write!(f, "{{L: {} items}}", v.len()),
            Self::M(m) => write!(f, "{{M: {} keys}}", m.len()),
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        let tag = self.type_descriptor();
        match self {
            Self::S(s) | Self::N(s) => map.serialize_entry(tag, s)?,
            Self::Ss(v) | Self::Ns(v) => map.serialize_entry(tag, v)?,
            Self::B(b) => map.serialize_entry(tag, &BASE64.encode(b))?,
            Self::Bs(v) => {
                let encoded: Vec<String> = v.iter().map(|b| BASE64.encode(b)).collect();
                map.serialize_entry(tag, &encoded)?;
            }
            Self::Bool(b) | Self::Null(b) => map.serialize_entry(tag, b)?,
            Self::L(list) => map.serialize_entry(tag, list)?,
            Self::M(m) => map.serialize_entry(tag, m)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttributeValueVisitor)
    }
}

struct AttributeValueVisitor;

fn decode_base64<E: de::Error>(encoded: &str) -> Result<Bytes, E> {
    BASE64.decode(encoded).map(Bytes::from).map_err(E::custom)
}

impl<'de> Visitor<'de> for AttributeValueVisitor {
    type Value = AttributeValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a DynamoDB AttributeValue object with exactly one type key")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
        let Some(tag) = map.next_key::<String>()? else {
            return Err(de::Error::custom("AttributeValue must have exactly one key"));
        };

        let value = match tag.as_str() {
            "S" => AttributeValue::S(map.next_value()?),
            "N" => AttributeValue::N(map.next_value()?),
            "B" => AttributeValue::B(decode_base64::<M::Error>(&map.next_value::<String>()?)?),
            "SS" => AttributeValue::Ss(map.next_value()?),
            "NS" => AttributeValue::Ns(map.next_value()?),
            "BS" => {
                let encoded: Vec<String> = map.next_value()?;
                AttributeValue::Bs(
                    encoded
                        .iter()
                        .map(|e| decode_base64::<M::Error>(e))
                        .collect::<Result<_, _>>()?,
                )
            }
            "BOOL" => AttributeValue::Bool(map.next_value()?),
            "NULL" => AttributeValue::Null(map.next_value()?),
            "L" => AttributeValue::L(map.next_value()?),
            "M" => AttributeValue::M(map.next_value()?),
            other => return Err(de::Error::unknown_field(other, TYPE_TAGS)),
        };

        if map.next_key::<String>()?.is_some() {
            return Err(de::Error::custom("AttributeValue must have exactly one key"));
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_string_value() {
        let val = AttributeValue::S("hello".to_owned());
        assert_eq!(serde_json::to_string(&val).unwrap(), r#"{"S":"hello"}"#);
    }

    #[test]
    fn test_should_serialize_null_value() {
        let val = AttributeValue::Null(true);
        assert_eq!(serde_json::to_string(&val).unwrap(), r#"{"NULL":true}"#);
    }

    #[test]
    fn test_should_serialize_nested_list() {
        let val = AttributeValue::L(vec![
            AttributeValue::S("a".to_owned()),
            AttributeValue::N("1".to_owned()),
        ]);
        assert_eq!(
            serde_json::to_string(&val).unwrap(),
            r#"{"L":[{"S":"a"},{"N":"1"}]}"#
        );
    }

    #[test]
    fn test_should_base64_encode_binary_sets() {
        let val = AttributeValue::Bs(vec![Bytes::from_static(b"ab"), Bytes::from_static(b"c")]);
        let json = serde_json::to_value(&val).unwrap();
        assert_eq!(json, serde_json::json!({"BS": ["YWI=", "Yw=="]}));
        let back: AttributeValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, val);
    }

    #[test]
    fn test_should_deserialize_number_set() {
        let val: AttributeValue = serde_json::from_str(r#"{"NS":["1","2","3"]}"#).unwrap();
        assert!(matches!(val, AttributeValue::Ns(ref v) if v.len() == 3));
    }

    #[test]
    fn test_should_reject_unknown_type_tag() {
        let err = serde_json::from_str::<AttributeValue>(r#"{"X":"1"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn test_should_reject_multiple_type_tags() {
        assert!(serde_json::from_str::<AttributeValue>(r#"{"S":"a","N":"1"}"#).is_err());
    }

    #[test]
    fn test_should_report_scalar_type() {
        assert_eq!(
            AttributeValue::N("1".to_owned()).scalar_type(),
            Some(ScalarAttributeType::N)
        );
        assert_eq!(AttributeValue::Bool(true).scalar_type(), None);
    }
}
