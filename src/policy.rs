//! Per-table step policy.
//!
//! Turns the described tables into the export and import plans. For each
//! table that survives the exclude list and the name filter:
//!
//! - provisioned tables get `Spike -> Export -> Reset` when a spike delta is
//!   configured, `Export` alone otherwise
//! - on-demand tables (read capacity <= 0) only ever get `Export`
//! - every table gets one `Import`
//!
//! An autoscaling minimum, when the table has one, replaces the table's raw
//! capacity as the base for both the spike and the reset target.

use tracing::{debug, info};

use crate::autoscaling::{
    AutoscalingInfo, CapacityDimension, ScalableTargets, scalable_target_exists, table_resource_id,
};
use crate::config::ExportConfig;
use crate::steps::{
    StepRecord, ThroughputChange, ThroughputTarget, table_export_step, table_import_step,
    task_runner_step, throughput_update_step,
};
use crate::table_operations::TableInfo;

/// Ordered export and import steps for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepPlans {
    pub export: Vec<StepRecord>,
    pub import: Vec<StepRecord>,
}

/// Where the generated steps point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanPaths {
    /// S3 folder of this export, one sub-folder per table.
    pub export_path: String,
    /// Location of the update-throughput script.
    pub script_path: String,
}

/// Spike and reset targets for a provisioned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThroughputPlan {
    pub spike: ThroughputTarget,
    pub reset: ThroughputTarget,
}

/// Work out spike and reset targets for `table`.
///
/// Returns `None` when no spike delta is configured or the table is on-demand.
pub fn throughput_plan(
    table: &TableInfo,
    spiked_read: Option<i64>,
    autoscaling: Option<AutoscalingInfo>,
) -> Option<ThroughputPlan> {
    let delta = spiked_read?;
    if !table.is_provisioned() {
        return None;
    }

    let autoscale_min = autoscaling.map(|a| a.min_capacity);
    let (spike_read, reset_read) = match autoscale_min {
        Some(min) => (min + delta, min),
        None => (delta, table.read_capacity),
    };

    Some(ThroughputPlan {
        spike: ThroughputTarget {
            read: spike_read,
            write: table.write_capacity,
            autoscale_min,
        },
        reset: ThroughputTarget {
            read: reset_read,
            write: table.write_capacity,
            autoscale_min,
        },
    })
}

/// Build both plans for `tables`, in the order given.
pub async fn build_plans<T>(
    tables: &[TableInfo],
    targets: &T,
    config: &ExportConfig,
    paths: &PlanPaths,
) -> StepPlans
where
    T: ScalableTargets + Sync + ?Sized,
{
    info!(filter = %config.filter, "exporting all tables where table name contains filter");

    let mut plans = StepPlans::default();

    if config.task_runner {
        let bootstrap = task_runner_step();
        plans.export.push(bootstrap.clone());
        plans.import.push(bootstrap);
    }

    for table in tables {
        if config.excludes.contains(&table.name) {
            info!(table = %table.name, "table is in the exclude list, skipping");
            continue;
        }
        if !table.name.contains(config.filter.as_str()) {
            debug!(table = %table.name, "table does not match filter, skipping");
            continue;
        }

        info!(table = %table.name, "generating EMR steps for table");
        add_table_steps(&mut plans, table, targets, config, paths).await;
    }

    plans
}

async fn add_table_steps<T>(
    plans: &mut StepPlans,
    table: &TableInfo,
    targets: &T,
    config: &ExportConfig,
    paths: &PlanPaths,
) where
    T: ScalableTargets + Sync + ?Sized,
{
    let table_path = format!("{}/{}", paths.export_path, table.name);

    let throughput = if table.is_provisioned() {
        info!(table = %table.name, "table uses provisioned capacity");
        let autoscaling = scalable_target_exists(
            targets,
            &table_resource_id(&table.name),
            CapacityDimension::Read,
        )
        .await;
        throughput_plan(table, config.spiked_read, autoscaling)
    } else {
        info!(table = %table.name, "table uses on-demand capacity, no spike or reset needed");
        None
    };

    if let Some(plan) = &throughput {
        plans.export.push(throughput_update_step(
            ThroughputChange::Spike,
            &table.name,
            &paths.script_path,
            &config.region,
            plan.spike,
        ));
    }

    plans.export.push(table_export_step(
        &table.name,
        &table_path,
        &config.read_throughput,
        config.export_jar.as_deref(),
        config.export_class.as_deref(),
    ));

    if let Some(plan) = &throughput {
        plans.export.push(throughput_update_step(
            ThroughputChange::Reset,
            &table.name,
            &paths.script_path,
            &config.region,
            plan.reset,
        ));
    }

    plans.import.push(table_import_step(
        &table.name,
        &table_path,
        &config.write_throughput,
        config.import_jar.as_deref(),
        config.import_class.as_deref(),
    ));
}
