//! Transport for the dynaccess DynamoDB client.
//!
//! DynamoDB speaks `awsJson1_0`: every request is a `POST /` whose
//! `X-Amz-Target` header names the operation and whose body is the JSON
//! parameter map. This crate owns that framing:
//!
//! - [`dispatch::Transport`] is the seam the rest of the client talks to.
//! - [`request`] builds the HTTP request for an operation.
//! - [`response`] verifies the checksum and decodes success or error bodies.
//! - [`transport::HttpTransport`] is the hyper-backed implementation.

pub mod body;
pub mod dispatch;
pub mod request;
pub mod response;
pub mod transport;

pub use dispatch::{Transport, TransportFuture, dispatch_operation};
pub use transport::{HttpTransport, HttpTransportConfig};
