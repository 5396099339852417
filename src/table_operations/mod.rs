//! Table catalog operations for DynamoDB.
//!
//! This module enumerates the tables of a region:
//! - `catalog` - The `TableCatalog` seam and its SDK implementation
//! - `list` - Follow `ListTables` pagination to collect every name
//! - `describe` - Fetch provisioned capacity for each table

mod catalog;
mod describe;
mod list;

// Re-export public items
pub use catalog::{TableCatalog, TableInfo, TablePage};
pub use describe::{describe_tables, table_info_from_description};
pub use list::{LIST_TABLES_PAGE_SIZE, list_tables};
