//! Conversions between native Rust values and [`AttributeValue`].
//!
//! Encoding goes through `From`/`Into`, so builders can accept
//! `impl Into<AttributeValue>`. Decoding goes through [`FromAttributeValue`]
//! because it can fail.

use std::collections::{BTreeSet, HashMap};

use bytes::Bytes;

use crate::attribute_value::AttributeValue;

/// Failure to convert between a native value and an [`AttributeValue`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The value carries a different type tag than requested.
    #[error("expected {expected} attribute value, found {found}")]
    TypeMismatch {
        /// Requested tag.
        expected: &'static str,
        /// Actual tag.
        found: &'static str,
    },
    /// An `N` literal does not parse into the requested numeric type.
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    /// The service rejects empty sets.
    #[error("{0} sets must contain at least one element")]
    EmptySet(&'static str),
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::S(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::S(value.to_owned())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Bytes> for AttributeValue {
    fn from(value: Bytes) -> Self {
        Self::B(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        Self::B(Bytes::from(value))
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(value: Vec<AttributeValue>) -> Self {
        Self::L(value)
    }
}

impl From<HashMap<String, AttributeValue>> for AttributeValue {
    fn from(value: HashMap<String, AttributeValue>) -> Self {
        Self::M(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null(true), Into::into)
    }
}

macro_rules! number_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for AttributeValue {
                fn from(value: $ty) -> Self {
                    Self::N(value.to_string())
                }
            }
        )+
    };
}

number_from!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl AttributeValue {
    /// Builds an `SS` value.
    pub fn string_set<I, S>(values: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: Vec<String> = values.into_iter().map(Into::into).collect();
        if set.is_empty() {
            return Err(CodecError::EmptySet("SS"));
        }
        Ok(Self::Ss(set))
    }

    /// Builds an `NS` value from anything that prints as a number.
    pub fn number_set<I, N>(values: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = N>,
        N: ToString,
    {
        let set: Vec<String> = values.into_iter().map(|n| n.to_string()).collect();
        if set.is_empty() {
            return Err(CodecError::EmptySet("NS"));
        }
        Ok(Self::Ns(set))
    }

    /// Builds a `BS` value.
    pub fn binary_set<I, B>(values: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        let set: Vec<Bytes> = values.into_iter().map(Into::into).collect();
        if set.is_empty() {
            return Err(CodecError::EmptySet("BS"));
        }
        Ok(Self::Bs(set))
    }
}

/// Decodes a native value out of an [`AttributeValue`].
pub trait FromAttributeValue: Sized {
    /// Performs the conversion.
    fn from_attribute_value(value: &AttributeValue) -> Result<Self, CodecError>;
}

fn mismatch(expected: &'static str, value: &AttributeValue) -> CodecError {
    CodecError::TypeMismatch {
        expected,
        found: value.type_descriptor(),
    }
}

fn parse_number<T: std::str::FromStr>(literal: &str) -> Result<T, CodecError> {
    literal
        .parse()
        .map_err(|_| CodecError::InvalidNumber(literal.to_owned()))
}

impl FromAttributeValue for String {
    fn from_attribute_value(value: &AttributeValue) -> Result<Self, CodecError> {
        value
            .as_s()
            .map(ToOwned::to_owned)
            .ok_or_else(|| mismatch("S", value))
    }
}

impl FromAttributeValue for bool {
    fn from_attribute_value(value: &AttributeValue) -> Result<Self, CodecError> {
        value.as_bool().ok_or_else(|| mismatch("BOOL", value))
    }
}

impl FromAttributeValue for Bytes {
    fn from_attribute_value(value: &AttributeValue) -> Result<Self, CodecError> {
        value.as_b().cloned().ok_or_else(|| mismatch("B", value))
    }
}

macro_rules! number_decode {
    ($($ty:ty),+) => {
        $(
            impl FromAttributeValue for $ty {
                fn from_attribute_value(value: &AttributeValue) -> Result<Self, CodecError> {
                    value
                        .as_n()
                        .ok_or_else(|| mismatch("N", value))
                        .and_then(parse_number)
                }
            }
        )+
    };
}

number_decode!(i32, i64, u32, u64, f64);

impl<T: FromAttributeValue> FromAttributeValue for Option<T> {
    fn from_attribute_value(value: &AttributeValue) -> Result<Self, CodecError> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_attribute_value(value).map(Some)
    }
}

impl<T: FromAttributeValue> FromAttributeValue for Vec<T> {
    fn from_attribute_value(value: &AttributeValue) -> Result<Self, CodecError> {
        value
            .as_l()
            .ok_or_else(|| mismatch("L", value))?
            .iter()
            .map(T::from_attribute_value)
            .collect()
    }
}

impl<T: FromAttributeValue> FromAttributeValue for HashMap<String, T> {
    fn from_attribute_value(value: &AttributeValue) -> Result<Self, CodecError> {
        value
            .as_m()
            .ok_or_else(|| mismatch("M", value))?
            .iter()
            .map(|(k, v)| T::from_attribute_value(v).map(|v| (k.clone(), v)))
            .collect()
    }
}

impl FromAttributeValue for BTreeSet<String> {
    fn from_attribute_value(value: &AttributeValue) -> Result<Self, CodecError> {
        match value {
            AttributeValue::Ss(set) => Ok(set.iter().cloned().collect()),
            other => Err(mismatch("SS", other)),
        }
    }
}

impl FromAttributeValue for BTreeSet<i64> {
    fn from_attribute_value(value: &AttributeValue) -> Result<Self, CodecError> {
        match value {
            AttributeValue::Ns(set) => set.iter().map(|n| parse_number(n)).collect(),
            other => Err(mismatch("NS", other)),
        }
    }
}

impl FromAttributeValue for BTreeSet<Bytes> {
    fn from_attribute_value(value: &AttributeValue) -> Result<Self, CodecError> {
        match value {
            AttributeValue::Bs(set) => Ok(set.iter().cloned().collect()),
            other => Err(mismatch("BS", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T>(value: T) -> T
    where
        T: Clone + Into<AttributeValue> + FromAttributeValue,
    {
        let encoded: AttributeValue = value.into();
        let wire = serde_json::to_value(&encoded).unwrap();
        let back: AttributeValue = serde_json::from_value(wire).unwrap();
        T::from_attribute_value(&back).unwrap()
    }

    #[test]
    fn test_should_encode_numbers_as_strings() {
        assert_eq!(AttributeValue::from(42_i64), AttributeValue::N("42".to_owned()));
        assert_eq!(AttributeValue::from(1.5_f64), AttributeValue::N("1.5".to_owned()));
    }

    #[test]
    fn test_should_roundtrip_scalars() {
        assert_eq!(roundtrip("thread".to_owned()), "thread");
        assert_eq!(roundtrip(-7_i64), -7);
        assert!(roundtrip(true));
        assert_eq!(
            roundtrip(Bytes::from_static(b"\x00\xff")),
            Bytes::from_static(b"\x00\xff")
        );
    }

    #[test]
    fn test_should_roundtrip_null_as_none() {
        let encoded = AttributeValue::from(None::<String>);
        assert_eq!(encoded, AttributeValue::Null(true));
        assert_eq!(Option::<String>::from_attribute_value(&encoded).unwrap(), None);
    }

    #[test]
    fn test_should_roundtrip_nested_list_and_map() {
        let mut inner = HashMap::new();
        inner.insert("n".to_owned(), AttributeValue::from(3_u32));
        let list = AttributeValue::L(vec![AttributeValue::M(inner.clone())]);
        let wire = serde_json::to_value(&list).unwrap();
        let back: AttributeValue = serde_json::from_value(wire).unwrap();
        let decoded = Vec::<HashMap<String, u32>>::from_attribute_value(&back).unwrap();
        assert_eq!(decoded[0]["n"], 3);
    }

    #[test]
    fn test_should_roundtrip_typed_sets() {
        let tags = AttributeValue::string_set(["a", "b"]).unwrap();
        let decoded = BTreeSet::<String>::from_attribute_value(&tags).unwrap();
        assert_eq!(decoded.len(), 2);

        let numbers = AttributeValue::number_set([3, 1, 2]).unwrap();
        let decoded = BTreeSet::<i64>::from_attribute_value(&numbers).unwrap();
        assert_eq!(decoded.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_should_reject_empty_sets() {
        assert_eq!(
            AttributeValue::string_set(Vec::<String>::new()),
            Err(CodecError::EmptySet("SS"))
        );
    }

    #[test]
    fn test_should_report_type_mismatch() {
        let err = i64::from_attribute_value(&AttributeValue::S("1".to_owned())).unwrap_err();
        assert_eq!(
            err,
            CodecError::TypeMismatch {
                expected: "N",
                found: "S"
            }
        );
    }
}
