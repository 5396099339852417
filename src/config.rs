//! Run configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

pub const DEFAULT_APP_NAME: &str = "MYAPP";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_IMPORT_REGION: &str = "us-west-2";
pub const DEFAULT_READ_THROUGHPUT: &str = "0.25";
pub const DEFAULT_WRITE_THROUGHPUT: &str = "0.5";

/// Everything one step-generation run needs besides the AWS clients.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory the three artifacts are written to.
    pub destination: PathBuf,
    /// S3 folder exports go under; also hosts `scripts/update-throughput.sh`.
    pub s3_location: String,
    pub app_name: String,
    /// Region the tables are exported from.
    pub region: String,
    /// Region the import files are meant for. Informational only.
    pub import_region: String,
    /// Fraction of read throughput the export may consume, passed to EMR verbatim.
    pub read_throughput: String,
    /// Fraction of write throughput the import may consume, passed to EMR verbatim.
    pub write_throughput: String,
    /// Read capacity delta to spike to before export. `None` disables spike/reset.
    pub spiked_read: Option<i64>,
    /// Only tables whose name contains this substring are exported.
    pub filter: String,
    pub excludes: HashSet<String>,
    /// Prepend the TaskRunner install step to both plans.
    pub task_runner: bool,
    pub export_jar: Option<String>,
    pub export_class: Option<String>,
    pub import_jar: Option<String>,
    pub import_class: Option<String>,
}

impl ExportConfig {
    /// Configuration with every optional setting at its default.
    pub fn new(destination: impl Into<PathBuf>, s3_location: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            s3_location: s3_location.into(),
            app_name: DEFAULT_APP_NAME.to_string(),
            region: DEFAULT_REGION.to_string(),
            import_region: DEFAULT_IMPORT_REGION.to_string(),
            read_throughput: DEFAULT_READ_THROUGHPUT.to_string(),
            write_throughput: DEFAULT_WRITE_THROUGHPUT.to_string(),
            spiked_read: None,
            filter: String::new(),
            excludes: HashSet::new(),
            task_runner: false,
            export_jar: None,
            export_class: None,
            import_jar: None,
            import_class: None,
        }
    }
}

/// Read a newline-delimited list of table names to exclude.
///
/// Trailing whitespace is trimmed and blank lines are skipped. A file that
/// cannot be read yields an empty set: the run goes on exporting everything
/// the filter allows.
pub fn load_excludes(path: &Path) -> HashSet<String> {
    info!(path = %path.display(), "reading excludes file");

    match std::fs::read_to_string(path) {
        Ok(contents) => parse_excludes(&contents),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unable to open excludes file, excluding nothing");
            HashSet::new()
        }
    }
}

fn parse_excludes(contents: &str) -> HashSet<String> {
    contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_should_default_like_the_cli() {
        let config = ExportConfig::new("/tmp/out", "s3://bucket/backups");
        assert_eq!(config.app_name, "MYAPP");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.import_region, "us-west-2");
        assert_eq!(config.read_throughput, "0.25");
        assert_eq!(config.write_throughput, "0.5");
        assert_eq!(config.spiked_read, None);
        assert!(!config.task_runner);
    }

    #[test]
    fn test_should_parse_exclude_lines() {
        let set = parse_excludes("Orders\nSessions  \r\n\nAudit");
        assert_eq!(set.len(), 3);
        assert!(set.contains("Orders"));
        assert!(set.contains("Sessions"));
        assert!(set.contains("Audit"));
    }

    #[test]
    fn test_should_load_excludes_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Orders").unwrap();
        writeln!(file, "Sessions").unwrap();

        let set = load_excludes(file.path());
        assert_eq!(set, HashSet::from(["Orders".to_string(), "Sessions".to_string()]));
    }

    #[test]
    fn test_should_treat_missing_excludes_file_as_empty() {
        // Deliberate deviation: historically a missing file left the exclude
        // list unset and crashed at first use. Now nothing is excluded.
        let dir = tempfile::tempdir().unwrap();
        let set = load_excludes(&dir.path().join("does-not-exist.txt"));
        assert!(set.is_empty());
    }
}
