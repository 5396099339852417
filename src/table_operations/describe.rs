//! Describe tables and extract their provisioned capacity.

use aws_sdk_dynamodb::types::{BillingMode, TableDescription};
use tracing::debug;

use crate::errors::Result;
use crate::table_operations::{TableCatalog, TableInfo};

/// Describe each named table, one call per name, in order.
///
/// The first failure aborts: a partial catalog would silently drop tables
/// from the export.
pub async fn describe_tables<C>(catalog: &C, names: &[String]) -> Result<Vec<TableInfo>>
where
    C: TableCatalog + Sync + ?Sized,
{
    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        let info = catalog.describe_table(name).await?;
        debug!(
            table = %info.name,
            read = info.read_capacity,
            write = info.write_capacity,
            "described table"
        );
        tables.push(info);
    }
    Ok(tables)
}

/// Convert a `DescribeTable` description into a [`TableInfo`].
///
/// Pay-per-request tables and tables without a throughput block report
/// zero capacity.
pub fn table_info_from_description(name: &str, description: &TableDescription) -> TableInfo {
    let on_demand = description
        .billing_mode_summary()
        .and_then(|s| s.billing_mode())
        .is_some_and(|mode| *mode == BillingMode::PayPerRequest);

    let (read, write) = match description.provisioned_throughput() {
        Some(tput) if !on_demand => (
            tput.read_capacity_units().unwrap_or(0),
            tput.write_capacity_units().unwrap_or(0),
        ),
        _ => (0, 0),
    };

    TableInfo::new(name, read, write)
}
