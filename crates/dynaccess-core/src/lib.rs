//! Client-side DynamoDB access layer.
//!
//! Structured conditions and updates are compiled into DynamoDB expression
//! strings with `#N`/`:N` placeholders, merged into per-operation request
//! payloads and sent through a [`dynaccess_http::Transport`].
#![allow(missing_docs, clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod config;
pub mod connection;
pub mod error;
pub mod expression;
pub mod request;
pub mod scan;
pub mod table;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::ClientConfig;
pub use connection::TableConnection;
pub use error::{ClientError, ClientResult};
pub use expression::{Condition, Path, SetValue, UpdateAction};
pub use scan::{RateLimitedScan, ScanBudget};
pub use table::TableDescriptor;
