use clap::Parser;
use std::path::PathBuf;

use crate::client::AwsConfig;
use crate::config::{
    DEFAULT_APP_NAME, DEFAULT_IMPORT_REGION, DEFAULT_READ_THROUGHPUT, DEFAULT_REGION,
    DEFAULT_WRITE_THROUGHPUT, ExportConfig, load_excludes,
};

/// EMR JSON steps producer for DynamoDB table extraction
#[derive(Parser, Debug)]
#[command(name = "produce-steps-json")]
#[command(version)]
#[command(about = "EMR JSON steps producer for DynamoDB table extraction", long_about = None)]
pub struct Cli {
    /// Where to place the EMR export and import steps files
    pub destination: PathBuf,

    /// The S3 folder path to place export files in and read import files from
    pub s3location: String,

    /// Name of the application we are exporting tables for. Used in the S3 path
    #[arg(short = 'a', long = "appname", default_value = DEFAULT_APP_NAME)]
    pub appname: String,

    /// The region to connect to for exporting
    #[arg(short = 'r', long = "region", default_value = DEFAULT_REGION)]
    pub region: String,

    /// The region to fill in for the import files
    #[arg(short = 'i', long = "impregion", default_value = DEFAULT_IMPORT_REGION)]
    pub impregion: String,

    /// The fraction of read throughput to use when exporting
    #[arg(short = 'e', long = "readtput", default_value = DEFAULT_READ_THROUGHPUT, value_parser = parse_fraction)]
    pub readtput: String,

    /// The fraction of write throughput to use when importing
    #[arg(short = 'w', long = "writetput", default_value = DEFAULT_WRITE_THROUGHPUT, value_parser = parse_fraction)]
    pub writetput: String,

    /// Read capacity to add before table export (omit to skip spike and reset steps)
    #[arg(short = 's', long = "spikedread")]
    pub spikedread: Option<i64>,

    /// A file containing a list of tables to exclude, one per line
    #[arg(short = 'x', long = "excludes")]
    pub excludes: Option<PathBuf>,

    /// Only export tables with this text in the table name
    #[arg(short = 'f', long = "filter", default_value = "")]
    pub filter: String,

    /// Prepend a Data Pipeline TaskRunner install step to both files
    #[arg(long = "task-runner")]
    pub task_runner: bool,

    /// Jar running the export tool
    #[arg(long = "export-jar")]
    pub export_jar: Option<String>,

    /// Main class of the export tool
    #[arg(long = "export-class")]
    pub export_class: Option<String>,

    /// Jar running the import tool
    #[arg(long = "import-jar")]
    pub import_jar: Option<String>,

    /// Main class of the import tool
    #[arg(long = "import-class")]
    pub import_class: Option<String>,

    /// AWS profile name from ~/.aws/credentials
    #[arg(long = "profile")]
    pub profile: Option<String>,

    /// Custom AWS endpoint URL (e.g., http://localhost:4566)
    #[arg(long = "endpoint-url")]
    pub endpoint_url: Option<String>,

    /// Log level filter, overridden by RUST_LOG
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Connection settings for the AWS clients.
    pub fn aws_config(&self) -> AwsConfig {
        AwsConfig {
            region: Some(self.region.clone()),
            profile: self.profile.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }

    /// Run configuration. Reads the excludes file when one was given.
    pub fn export_config(&self) -> ExportConfig {
        let mut config = ExportConfig::new(self.destination.clone(), self.s3location.clone());
        config.app_name = self.appname.clone();
        config.region = self.region.clone();
        config.import_region = self.impregion.clone();
        config.read_throughput = self.readtput.clone();
        config.write_throughput = self.writetput.clone();
        config.spiked_read = self.spikedread;
        config.filter = self.filter.clone();
        if let Some(path) = &self.excludes {
            config.excludes = load_excludes(path);
        }
        config.task_runner = self.task_runner;
        config.export_jar = self.export_jar.clone();
        config.export_class = self.export_class.clone();
        config.import_jar = self.import_jar.clone();
        config.import_class = self.import_class.clone();
        config
    }
}

/// Accept a positive number, keeping the user's spelling for the step args.
fn parse_fraction(value: &str) -> Result<String, String> {
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f > 0.0 => Ok(value.to_string()),
        Ok(_) => Err(format!("'{}' must be a positive number", value)),
        Err(e) => Err(format!("'{}' is not a number: {}", value, e)),
    }
}
