//! DynamoDB wire model types for dynaccess.
//!
//! Hand-written serde types for the `awsJson1_0` protocol: the tagged
//! `AttributeValue` union, the native-value codec, service error codes and
//! the input/output shapes of every operation the client issues.
// "DynamoDB" appears in virtually every doc comment in this crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod attribute_value;
pub mod codec;
pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use attribute_value::AttributeValue;
pub use codec::{CodecError, FromAttributeValue};
pub use error::{DynamoDBError, DynamoDBErrorCode};
pub use operations::DynamoDBOperation;
pub use types::{Item, Key};
