//! One step-generation run: enumerate, decide, write.

use tracing::info;

use crate::autoscaling::ScalableTargets;
use crate::config::ExportConfig;
use crate::errors::Result;
use crate::output::{generate_s3_path, script_path, write_artifacts};
use crate::policy::{PlanPaths, StepPlans, build_plans};
use crate::table_operations::{TableCatalog, describe_tables, list_tables};

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// S3 folder the export steps write to.
    pub s3_path: String,
    /// Tables seen in the region before filtering.
    pub tables_listed: usize,
    pub plans: StepPlans,
}

/// Generate and write the export and import step files.
///
/// `timestamp` is the path segment that makes this export unique, see
/// [`crate::output::export_timestamp`]. Catalog failures abort before
/// anything is written.
pub async fn run<C, T>(
    catalog: &C,
    targets: &T,
    config: &ExportConfig,
    timestamp: &str,
) -> Result<RunSummary>
where
    C: TableCatalog + Sync + ?Sized,
    T: ScalableTargets + Sync + ?Sized,
{
    info!(
        region = %config.region,
        import_region = %config.import_region,
        destination = %config.destination.display(),
        "producing EMR steps"
    );

    let names = list_tables(catalog).await?;
    let tables = describe_tables(catalog, &names).await?;

    let paths = PlanPaths {
        export_path: generate_s3_path(
            &config.s3_location,
            &config.region,
            timestamp,
            &config.app_name,
        ),
        script_path: script_path(&config.s3_location),
    };

    let plans = build_plans(&tables, targets, config, &paths).await;
    write_artifacts(&config.destination, &paths.export_path, &plans)?;

    info!(
        export_steps = plans.export.len(),
        import_steps = plans.import.len(),
        s3_path = %paths.export_path,
        "wrote step files"
    );

    Ok(RunSummary {
        s3_path: paths.export_path,
        tables_listed: names.len(),
        plans,
    })
}
