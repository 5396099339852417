//! Application Auto Scaling lookups.
//!
//! The lookup is best-effort: a failed call is logged and reported as "no
//! scalable target", the same as a table without autoscaling.

use async_trait::async_trait;
use aws_sdk_applicationautoscaling::Client;
use aws_sdk_applicationautoscaling::types::{ScalableDimension, ServiceNamespace};
use tracing::{debug, info, warn};

use crate::errors::{AwsService, Result, map_sdk_error};

/// Capacity dimension of a DynamoDB table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityDimension {
    Read,
    Write,
}

impl CapacityDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityDimension::Read => "dynamodb:table:ReadCapacityUnits",
            CapacityDimension::Write => "dynamodb:table:WriteCapacityUnits",
        }
    }
}

/// Autoscaling bounds of one table dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoscalingInfo {
    pub min_capacity: i64,
}

/// Resource id Application Auto Scaling uses for a table.
pub fn table_resource_id(table: &str) -> String {
    format!("table/{}", table)
}

/// Read access to registered scalable targets.
#[async_trait]
pub trait ScalableTargets {
    /// Minimum capacities of the targets registered for `resource_id` on
    /// `dimension`, in the order the service returns them.
    async fn min_capacities(
        &self,
        resource_id: &str,
        dimension: CapacityDimension,
    ) -> Result<Vec<i64>>;
}

#[async_trait]
impl ScalableTargets for Client {
    async fn min_capacities(
        &self,
        resource_id: &str,
        dimension: CapacityDimension,
    ) -> Result<Vec<i64>> {
        let output = self
            .describe_scalable_targets()
            .service_namespace(ServiceNamespace::from("dynamodb"))
            .resource_ids(resource_id)
            .scalable_dimension(ScalableDimension::from(dimension.as_str()))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, AwsService::ApplicationAutoScaling, None))?;

        Ok(output
            .scalable_targets()
            .iter()
            .map(|t| i64::from(t.min_capacity()))
            .collect())
    }
}

/// Check whether `resource_id` has a scalable target on `dimension`.
///
/// Returns the first target's minimum capacity. Never fails: lookup errors
/// are logged and treated as "autoscaling disabled".
pub async fn scalable_target_exists<T>(
    targets: &T,
    resource_id: &str,
    dimension: CapacityDimension,
) -> Option<AutoscalingInfo>
where
    T: ScalableTargets + Sync + ?Sized,
{
    debug!(
        resource_id,
        dimension = dimension.as_str(),
        "checking for scalable target"
    );

    match targets.min_capacities(resource_id, dimension).await {
        Ok(mins) => {
            let target = mins
                .first()
                .map(|&min_capacity| AutoscalingInfo { min_capacity });
            if let Some(found) = target {
                info!(resource_id, min_capacity = found.min_capacity, "autoscaling enabled");
            }
            target
        }
        Err(e) => {
            warn!(resource_id, error = %e, "failed to describe scalable targets");
            None
        }
    }
}
