//! File-based status source.
//!
//! Reads status reports from a JSON file. Useful for development against a
//! captured report and for demos without a live backend; the file is
//! re-read on every poll cycle.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{SourceError, StatusReport, StatusSource};

/// A data source that reads status reports from a JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StatusSource for FileSource {
    async fn fetch(&self) -> Result<StatusReport, SourceError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Transport(format!("read error: {}", e)))?;

        serde_json::from_str(&content).map_err(|e| SourceError::Parse(e.to_string()))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "domains": {
                "rt": {
                    "title": "Realtime",
                    "workers": [ { "key": "rt_sales_sync", "status": "ok" } ]
                }
            },
            "ok": true
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/status.json");
        assert_eq!(source.path(), Path::new("/tmp/status.json"));
        assert_eq!(source.description(), "file: /tmp/status.json");
    }

    #[tokio::test]
    async fn test_file_source_reads_report() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let source = FileSource::new(file.path());
        let report = source.fetch().await.unwrap();
        assert_eq!(report.domains.len(), 1);
        assert!(report.ok);
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/path/status.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Transport(_)));
        assert!(err.to_string().contains("read error"));
    }

    #[tokio::test]
    async fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let source = FileSource::new(file.path());
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
