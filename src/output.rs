//! S3 path derivation and artifact writing.

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, info};

use crate::errors::{Result, StepsError};
use crate::policy::StepPlans;
use crate::steps::StepRecord;

pub const S3_PATH_FILE: &str = "s3path.info";
pub const EXPORT_STEPS_FILE: &str = "exportSteps.json";
pub const IMPORT_STEPS_FILE: &str = "importSteps.json";

const UPDATE_THROUGHPUT_SCRIPT: &str = "scripts/update-throughput.sh";

/// Timestamp segment of the export path, e.g. `2024/01/01/00_00.00`.
pub fn export_timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format("%Y/%m/%d/%H_%M.%S").to_string()
}

/// Build `<base>/<region>/<app>/<timestamp>`, dropping trailing slashes from `base`.
pub fn generate_s3_path(base: &str, region: &str, timestamp: &str, app_name: &str) -> String {
    let path = format!(
        "{}/{}/{}/{}",
        base.trim_end_matches('/'),
        region,
        app_name,
        timestamp
    );
    debug!(base, path = %path, "generated s3 path");
    path
}

/// Location of the update-throughput script under the S3 folder.
pub fn script_path(s3_location: &str) -> String {
    format!("{}/{}", s3_location.trim_end_matches('/'), UPDATE_THROUGHPUT_SCRIPT)
}

/// Overwrite `path` with `content`.
pub fn write_file(content: &str, path: &Path) -> Result<()> {
    info!(path = %path.display(), "writing file");
    fs::write(path, content).map_err(|source| StepsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Render steps as a JSON array indented by four spaces.
pub fn steps_to_json(steps: &[StepRecord]) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    steps.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the path-info file and both step files into `destination`.
pub fn write_artifacts(destination: &Path, s3_path: &str, plans: &StepPlans) -> Result<()> {
    write_file(s3_path, &destination.join(S3_PATH_FILE))?;
    write_file(&steps_to_json(&plans.export)?, &destination.join(EXPORT_STEPS_FILE))?;
    write_file(&steps_to_json(&plans.import)?, &destination.join(IMPORT_STEPS_FILE))?;
    Ok(())
}
