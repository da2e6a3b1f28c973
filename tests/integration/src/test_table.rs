//! Table lifecycle tests.

#[cfg(test)]
mod tests {
    use dynaccess_core::request::UpdateTableOptions;
    use dynaccess_model::types::BillingMode;

    use crate::{cleanup_table, connection, create_composite_table, test_table_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_and_describe_table() {
        let conn = create_composite_table("describe").await.unwrap();

        let description = conn.describe_table().await.unwrap();
        assert_eq!(description.table_name.as_deref(), Some(conn.table_name()));

        let descriptor = conn.descriptor().await.unwrap();
        assert_eq!(descriptor.hash_key(), "pk");
        assert_eq!(descriptor.range_key(), Some("sk"));

        cleanup_table(&conn).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_update_billing_mode() {
        let conn = create_composite_table("update").await.unwrap();

        conn.update_table(UpdateTableOptions {
            billing_mode: Some(BillingMode::Provisioned),
            read_capacity_units: Some(5),
            write_capacity_units: Some(5),
            ..UpdateTableOptions::default()
        })
        .await
        .unwrap();

        cleanup_table(&conn).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fail_to_describe_missing_table() {
        let conn = connection(&test_table_name("missing")).unwrap();
        let err = conn.describe_table().await.unwrap_err();
        assert!(err.as_service().is_some());
    }
}
