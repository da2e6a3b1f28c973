//! Integration tests for dynaccess against a DynamoDB-compatible endpoint.
//!
//! These tests require a server at `DYNAMODB_ENDPOINT` (default
//! `localhost:4566`). They are marked `#[ignore]` so they don't run during
//! normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p dynaccess-integration -- --ignored
//! ```

use std::sync::{Arc, Once};

use dynaccess_core::request::CreateTableOptions;
use dynaccess_core::{ClientConfig, TableConnection};
use dynaccess_http::HttpTransport;
use dynaccess_model::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, ScalarAttributeType,
};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Generate a unique table name for a test.
#[must_use]
pub fn test_table_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// A connection to `table_name` over the environment-configured endpoint.
pub fn connection(table_name: &str) -> anyhow::Result<TableConnection<HttpTransport>> {
    init_tracing();
    let transport = Arc::new(HttpTransport::from_env()?);
    Ok(TableConnection::new(
        table_name,
        transport,
        ClientConfig::from_env(),
    ))
}

/// Create a `pk`/`sk` table and return a connection to it. Caller is
/// responsible for cleanup.
pub async fn create_composite_table(
    prefix: &str,
) -> anyhow::Result<TableConnection<HttpTransport>> {
    let conn = connection(&test_table_name(prefix))?;
    conn.create_table(CreateTableOptions {
        attribute_definitions: vec![
            AttributeDefinition::new("pk", ScalarAttributeType::S),
            AttributeDefinition::new("sk", ScalarAttributeType::S),
        ],
        key_schema: vec![KeySchemaElement::hash("pk"), KeySchemaElement::range("sk")],
        billing_mode: Some(BillingMode::PayPerRequest),
        ..CreateTableOptions::default()
    })
    .await?;
    conn.describe_table().await?;
    Ok(conn)
}

/// Delete the table, ignoring errors.
pub async fn cleanup_table(conn: &TableConnection<HttpTransport>) {
    let _ = conn.delete_table().await;
}

mod test_items;
mod test_scan;
mod test_table;
