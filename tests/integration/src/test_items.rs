//! Item, query and batch tests.

#[cfg(test)]
mod tests {
    use dynaccess_core::Path;
    use dynaccess_core::request::{
        BatchGetOptions, BatchWriteOptions, GetItemOptions, PutItemOptions, QueryOptions,
        UpdateItemOptions,
    };
    use dynaccess_model::error::DynamoDBErrorCode;
    use dynaccess_model::types::ReturnValue;
    use dynaccess_model::{AttributeValue, Item, Key};

    use crate::{cleanup_table, create_composite_table};

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_owned())
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_get_and_update_item() {
        let conn = create_composite_table("items").await.unwrap();

        let attributes = Item::from([("views".to_owned(), AttributeValue::from(1))]);
        conn.put_item("p1", Some(s("s1")), attributes, PutItemOptions::default())
            .await
            .unwrap();

        let output = conn
            .update_item(
                "p1",
                Some(s("s1")),
                UpdateItemOptions {
                    actions: vec![
                        Path::new("views").add(2),
                        Path::new("tags").set(Path::new("tags").if_not_exists(s("new"))),
                    ],
                    condition: Some(Path::new("views").equals(1)),
                    return_values: Some(ReturnValue::AllNew),
                    ..UpdateItemOptions::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(output.attributes["views"], AttributeValue::N("3".to_owned()));
        assert_eq!(output.attributes["tags"], s("new"));

        let item = conn
            .get_item(
                "p1",
                Some(s("s1")),
                GetItemOptions {
                    attributes_to_get: vec!["views".to_owned()],
                    consistent_read: Some(true),
                    ..GetItemOptions::default()
                },
            )
            .await
            .unwrap()
            .item
            .unwrap();
        assert_eq!(item.len(), 1);

        cleanup_table(&conn).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_failed_condition() {
        let conn = create_composite_table("condition").await.unwrap();
        conn.put_item("p1", Some(s("s1")), Item::new(), PutItemOptions::default())
            .await
            .unwrap();

        let err = conn
            .put_item(
                "p1",
                Some(s("s1")),
                Item::new(),
                PutItemOptions {
                    condition: Some(Path::new("pk").does_not_exist()),
                    ..PutItemOptions::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.as_service().map(|e| e.code),
            Some(DynamoDBErrorCode::ConditionalCheckFailedException)
        );

        cleanup_table(&conn).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_batch_write_then_query_and_batch_get() {
        let conn = create_composite_table("batch").await.unwrap();

        let items: Vec<Item> = (0..30)
            .map(|i| {
                Item::from([
                    ("pk".to_owned(), s("forum")),
                    ("sk".to_owned(), s(&format!("thread-{i:02}"))),
                    ("replies".to_owned(), AttributeValue::from(i)),
                ])
            })
            .collect();
        let output = conn
            .batch_write_item(items, Vec::new(), BatchWriteOptions::default())
            .await
            .unwrap();
        assert!(output.unprocessed_items.is_empty());

        let page = conn
            .query(
                "forum",
                QueryOptions {
                    range_key_condition: Some(Path::new("sk").begins_with("thread-1")),
                    filter_condition: Some(Path::new("replies").greater_than(12)),
                    ..QueryOptions::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 7);

        let keys: Vec<Key> = (0..3)
            .map(|i| {
                Key::from([
                    ("pk".to_owned(), s("forum")),
                    ("sk".to_owned(), s(&format!("thread-{i:02}"))),
                ])
            })
            .collect();
        let output = conn
            .batch_get_item(keys, BatchGetOptions::default())
            .await
            .unwrap();
        assert_eq!(output.responses[conn.table_name()].len(), 3);

        cleanup_table(&conn).await;
    }
}
