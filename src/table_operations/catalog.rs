//! The `TableCatalog` trait and its DynamoDB implementation.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use crate::errors::{AwsService, Result, StepsError, map_sdk_error};
use crate::table_operations::describe::table_info_from_description;

/// Name and provisioned capacity of one table.
///
/// On-demand tables carry a read capacity of 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub read_capacity: i64,
    pub write_capacity: i64,
}

impl TableInfo {
    pub fn new(name: impl Into<String>, read_capacity: i64, write_capacity: i64) -> Self {
        Self {
            name: name.into(),
            read_capacity,
            write_capacity,
        }
    }

    /// True when the table has provisioned read throughput that can be spiked.
    pub fn is_provisioned(&self) -> bool {
        self.read_capacity > 0
    }
}

/// One page of a `ListTables` response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TablePage {
    pub names: Vec<String>,
    /// Where the next page starts, `None` on the last page.
    pub last_evaluated: Option<String>,
}

/// Read access to the table catalog of one region.
#[async_trait]
pub trait TableCatalog {
    /// Fetch one page of table names starting after `start`.
    async fn list_table_page(&self, start: Option<&str>, limit: i32) -> Result<TablePage>;

    /// Fetch the capacity of a single table.
    async fn describe_table(&self, name: &str) -> Result<TableInfo>;
}

#[async_trait]
impl TableCatalog for Client {
    async fn list_table_page(&self, start: Option<&str>, limit: i32) -> Result<TablePage> {
        let output = self
            .list_tables()
            .set_exclusive_start_table_name(start.map(str::to_string))
            .limit(limit)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, None))?;

        Ok(TablePage {
            names: output.table_names().to_vec(),
            last_evaluated: output.last_evaluated_table_name().map(str::to_string),
        })
    }

    async fn describe_table(&self, name: &str) -> Result<TableInfo> {
        let output = self
            .describe_table()
            .table_name(name)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, Some(name)))?;

        let description = output.table().ok_or_else(|| StepsError::Service {
            service: "DynamoDB",
            message: format!("DescribeTable returned no description for '{}'", name),
        })?;

        Ok(table_info_from_description(name, description))
    }
}
