//! produce-steps-json — writes EMR export/import step files for the
//! DynamoDB tables of a region.
//!
//! # Usage
//!
//! ```text
//! produce-steps-json -r us-east-1 -s 1000 -x excludes.txt ./out s3://bucket/backups
//! ```
//!
//! Writes `s3path.info`, `exportSteps.json` and `importSteps.json` into the
//! destination directory.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ddb_emr_steps::args::Cli;
use ddb_emr_steps::{AwsClients, export_timestamp, run};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `--log-level`.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = cli.export_config();
    let clients = AwsClients::connect(&cli.aws_config()).await;
    let timestamp = export_timestamp(&chrono::Local::now());

    let summary = run(&clients.dynamodb, &clients.autoscaling, &config, &timestamp)
        .await
        .context("failed to produce EMR steps")?;

    info!(
        tables = summary.tables_listed,
        s3_path = %summary.s3_path,
        "done"
    );
    Ok(())
}
