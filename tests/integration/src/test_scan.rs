//! Rate-limited scan tests.

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;

    use dynaccess_core::ScanBudget;
    use dynaccess_core::request::{BatchWriteOptions, ScanOptions};
    use dynaccess_core::scan::RateLimitedScanOptions;
    use dynaccess_model::{AttributeValue, Item};

    use crate::{cleanup_table, create_composite_table};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_scan_every_item_under_budget() {
        let conn = create_composite_table("scan").await.unwrap();
        let items: Vec<Item> = (0..40)
            .map(|i| {
                Item::from([
                    ("pk".to_owned(), AttributeValue::S(format!("p{i}"))),
                    ("sk".to_owned(), AttributeValue::S("s".to_owned())),
                ])
            })
            .collect();
        conn.batch_write_item(items, Vec::new(), BatchWriteOptions::default())
            .await
            .unwrap();

        let mut budget = ScanBudget::from_config(conn.config(), 10);
        budget.allow_without_consumed_capacity = true;
        let scan = conn
            .rate_limited_scan(RateLimitedScanOptions {
                scan: ScanOptions::default(),
                page_size: Some(7),
                limit: None,
                budget,
            })
            .await
            .unwrap();

        let all: Vec<Item> = scan.into_stream().try_collect().await.unwrap();
        assert_eq!(all.len(), 40);

        cleanup_table(&conn).await;
    }
}
