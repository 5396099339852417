//! ddb-emr-steps — EMR step producer for DynamoDB table export and import.
//!
//! Lists the DynamoDB tables of a region and writes two EMR step files: one
//! that exports every selected table to S3 (optionally spiking its read
//! throughput around the export) and one that imports them back.

pub mod args;
pub mod autoscaling;
pub mod client;
pub mod config;
pub mod errors;
pub mod output;
pub mod pipeline;
pub mod policy;
pub mod steps;
pub mod table_operations;

pub use autoscaling::{AutoscalingInfo, CapacityDimension, ScalableTargets, scalable_target_exists};
pub use client::{AwsClients, AwsConfig};
pub use config::{ExportConfig, load_excludes};
pub use errors::{Result, StepsError};
pub use output::{export_timestamp, generate_s3_path, write_file};
pub use pipeline::{RunSummary, run};
pub use policy::{StepPlans, build_plans};
pub use steps::{ActionOnFailure, StepRecord};
pub use table_operations::{TableCatalog, TableInfo, describe_tables, list_tables};
