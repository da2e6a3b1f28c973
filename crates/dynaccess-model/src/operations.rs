//! DynamoDB operations issued by the client.

use std::fmt;

/// Every DynamoDB API action the client can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamoDBOperation {
    // Table management
    /// Create a table.
    CreateTable,
    /// Delete a table.
    DeleteTable,
    /// Describe a table.
    DescribeTable,
    /// Change table or index throughput.
    UpdateTable,

    // Item CRUD
    /// Put (insert or replace) an item.
    PutItem,
    /// Get an item by primary key.
    GetItem,
    /// Update an item.
    UpdateItem,
    /// Delete an item by primary key.
    DeleteItem,

    // Query & Scan
    /// Query items by key condition.
    Query,
    /// Scan a table or index.
    Scan,

    // Batch operations
    /// Read many items at once.
    BatchGetItem,
    /// Put or delete many items at once.
    BatchWriteItem,
}

impl DynamoDBOperation {
    /// Returns the API action name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTable => "CreateTable",
            Self::DeleteTable => "DeleteTable",
            Self::DescribeTable => "DescribeTable",
            Self::UpdateTable => "UpdateTable",
            Self::PutItem => "PutItem",
            Self::GetItem => "GetItem",
            Self::UpdateItem => "UpdateItem",
            Self::DeleteItem => "DeleteItem",
            Self::Query => "Query",
            Self::Scan => "Scan",
            Self::BatchGetItem => "BatchGetItem",
            Self::BatchWriteItem => "BatchWriteItem",
        }
    }

    /// Returns `true` for the table lifecycle operations.
    #[must_use]
    pub fn is_control_plane(&self) -> bool {
        matches!(
            self,
            Self::CreateTable | Self::DeleteTable | Self::DescribeTable | Self::UpdateTable
        )
    }
}

impl fmt::Display for DynamoDBOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
