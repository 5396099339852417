//! EMR step records.
//!
//! Field names and their order are what EMR's step loader parses, so the
//! struct layout below is the wire format.

use serde::Serialize;
use tracing::debug;

/// Script runner used for the throughput update and TaskRunner steps.
pub const SCRIPT_RUNNER_JAR: &str =
    "s3://us-east-1.elasticmapreduce/libs/script-runner/script-runner.jar";

/// EMR DynamoDB storage handler, home of the export and import tools.
pub const DEFAULT_DDB_JAR: &str =
    "s3://dynamodb-emr-us-east-1/emr-ddb-storage-handler/2.1.0/emr-ddb-2.1.0.jar";

pub const DEFAULT_EXPORT_CLASS: &str = "org.apache.hadoop.dynamodb.tools.DynamoDbExport";
pub const DEFAULT_IMPORT_CLASS: &str = "org.apache.hadoop.dynamodb.tools.DynamoDbImport";

const CUSTOM_JAR: &str = "CUSTOM_JAR";

const TASK_RUNNER_INSTALLER: &str =
    "s3://datapipeline-us-east-1/us-east-1/bootstrap-actions/latest/TaskRunner/install-remote-runner-v2";

/// What EMR does with the cluster when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionOnFailure {
    #[serde(rename = "CONTINUE")]
    Continue,
    #[serde(rename = "TERMINATE_CLUSTER")]
    Terminate,
}

/// Which side of the export a throughput update sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThroughputChange {
    Spike,
    Reset,
}

impl ThroughputChange {
    fn label(&self) -> &'static str {
        match self {
            ThroughputChange::Spike => "Spike",
            ThroughputChange::Reset => "Reset",
        }
    }
}

/// A single EMR step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ActionOnFailure")]
    pub action_on_failure: ActionOnFailure,
    #[serde(rename = "Type")]
    pub step_type: &'static str,
    #[serde(rename = "Jar")]
    pub jar: String,
    #[serde(rename = "Args")]
    pub args: Vec<String>,
}

/// Target capacities for one throughput update step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThroughputTarget {
    pub read: i64,
    pub write: i64,
    /// Autoscaling minimum, when the table has a scalable target.
    pub autoscale_min: Option<i64>,
}

/// Build a step that runs the update-throughput script against one table.
pub fn throughput_update_step(
    change: ThroughputChange,
    table: &str,
    script_path: &str,
    region: &str,
    target: ThroughputTarget,
) -> StepRecord {
    debug!(table, change = change.label(), "adding throughput update step");

    let mut args = vec![
        script_path.to_string(),
        region.to_string(),
        table.to_string(),
        target.read.to_string(),
        target.write.to_string(),
    ];
    if let Some(min) = target.autoscale_min {
        args.push(min.to_string());
    }

    StepRecord {
        name: format!("{} Throughput: {}", change.label(), table),
        action_on_failure: ActionOnFailure::Continue,
        step_type: CUSTOM_JAR,
        jar: SCRIPT_RUNNER_JAR.to_string(),
        args,
    }
}

/// Build the export step for one table.
///
/// `jar` and `class` fall back to the EMR DynamoDB storage handler defaults.
pub fn table_export_step(
    table: &str,
    s3_path: &str,
    read_fraction: &str,
    jar: Option<&str>,
    class: Option<&str>,
) -> StepRecord {
    debug!(table, "adding table export step");

    StepRecord {
        name: format!("Export Table:{}", table),
        action_on_failure: ActionOnFailure::Continue,
        step_type: CUSTOM_JAR,
        jar: jar.unwrap_or(DEFAULT_DDB_JAR).to_string(),
        args: vec![
            class.unwrap_or(DEFAULT_EXPORT_CLASS).to_string(),
            s3_path.to_string(),
            table.to_string(),
            read_fraction.to_string(),
        ],
    }
}

/// Build the import step for one table.
pub fn table_import_step(
    table: &str,
    s3_path: &str,
    write_fraction: &str,
    jar: Option<&str>,
    class: Option<&str>,
) -> StepRecord {
    debug!(table, "adding table import step");

    StepRecord {
        name: format!("Import Table:{}", table),
        action_on_failure: ActionOnFailure::Continue,
        step_type: CUSTOM_JAR,
        jar: jar.unwrap_or(DEFAULT_DDB_JAR).to_string(),
        args: vec![
            class.unwrap_or(DEFAULT_IMPORT_CLASS).to_string(),
            s3_path.to_string(),
            table.to_string(),
            write_fraction.to_string(),
        ],
    }
}

/// Build the Data Pipeline TaskRunner install step.
///
/// A failed install leaves the cluster useless, so this one terminates it.
pub fn task_runner_step() -> StepRecord {
    debug!("adding task runner step");

    let args = [
        TASK_RUNNER_INSTALLER,
        "--workerGroup=1234",
        "--endpoint=https://datapipeline.us-east-1.amazonaws.com",
        "--region=us-east-1",
        "--logUri=none",
        "--taskRunnerId=DynamoTaskRunner1",
        "--zipFile=http://datapipeline-us-east-1.s3.amazonaws.com/us-east-1/software/latest/TaskRunner/TaskRunner-1.0.zip",
        "--mysqlFile=http://datapipeline-us-east-1.s3.amazonaws.com/us-east-1/software/latest/TaskRunner/mysql-connector-java-bin.jar",
        "--hiveCsvSerdeFile=http://datapipeline-us-east-1.s3.amazonaws.com/us-east-1/software/latest/TaskRunner/csv-serde.jar",
        "--proxyHost=",
        "--proxyPort=-1",
        "--username=",
        "--password=",
        "--windowsDomain=",
        "--windowsWorkgroup=",
        "--releaseLabel=",
    ];

    StepRecord {
        name: "Install TaskRunner".to_string(),
        action_on_failure: ActionOnFailure::Terminate,
        step_type: CUSTOM_JAR,
        jar: SCRIPT_RUNNER_JAR.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_keys_in_emr_order() {
        let step = table_export_step("Orders", "s3://bucket/p/Orders", "0.25", None, None);
        let json = serde_json::to_string(&step).unwrap();

        let positions: Vec<usize> = ["\"Name\"", "\"ActionOnFailure\"", "\"Type\"", "\"Jar\"", "\"Args\""]
            .iter()
            .map(|k| json.find(k).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", json);
        assert!(json.contains("\"ActionOnFailure\":\"CONTINUE\""));
        assert!(json.contains("\"Type\":\"CUSTOM_JAR\""));
    }

    #[test]
    fn test_should_build_export_step_with_defaults() {
        let step = table_export_step("Orders", "s3://bucket/p/Orders", "0.25", None, None);
        assert_eq!(step.name, "Export Table:Orders");
        assert_eq!(step.jar, DEFAULT_DDB_JAR);
        assert_eq!(
            step.args,
            vec![DEFAULT_EXPORT_CLASS, "s3://bucket/p/Orders", "Orders", "0.25"]
        );
    }

    #[test]
    fn test_should_honor_executable_overrides() {
        let step = table_import_step(
            "Orders",
            "s3://bucket/p/Orders",
            "0.5",
            Some("s3://jars/custom.jar"),
            Some("com.example.Import"),
        );
        assert_eq!(step.name, "Import Table:Orders");
        assert_eq!(step.jar, "s3://jars/custom.jar");
        assert_eq!(step.args[0], "com.example.Import");
        assert_eq!(step.args[3], "0.5");
    }

    #[test]
    fn test_should_append_autoscale_min_only_when_present() {
        let with_min = throughput_update_step(
            ThroughputChange::Spike,
            "Orders",
            "s3://bucket/scripts/update-throughput.sh",
            "us-east-1",
            ThroughputTarget { read: 25, write: 5, autoscale_min: Some(5) },
        );
        assert_eq!(with_min.name, "Spike Throughput: Orders");
        assert_eq!(
            with_min.args,
            vec!["s3://bucket/scripts/update-throughput.sh", "us-east-1", "Orders", "25", "5", "5"]
        );

        let without_min = throughput_update_step(
            ThroughputChange::Reset,
            "Orders",
            "s3://bucket/scripts/update-throughput.sh",
            "us-east-1",
            ThroughputTarget { read: 10, write: 5, autoscale_min: None },
        );
        assert_eq!(without_min.name, "Reset Throughput: Orders");
        assert_eq!(without_min.args.len(), 5);
        assert_eq!(without_min.jar, SCRIPT_RUNNER_JAR);
    }

    #[test]
    fn test_should_terminate_cluster_when_task_runner_fails() {
        let step = task_runner_step();
        assert_eq!(step.action_on_failure, ActionOnFailure::Terminate);
        assert_eq!(step.args[0], TASK_RUNNER_INSTALLER);
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"ActionOnFailure\":\"TERMINATE_CLUSTER\""));
    }
}
