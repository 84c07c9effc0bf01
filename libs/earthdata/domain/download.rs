//! Download results and the on-disk manifest

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the manifest written next to the downloads
pub const MANIFEST_FILE: &str = "manifest.json";

/// A file that was fetched and written successfully
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOutcome {
    pub url: String,
    pub path: PathBuf,
    pub bytes: u64,
    pub chunks: usize,
    pub sha256: String,
}

/// A file that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDownload {
    pub url: String,
    pub reason: String,
}

/// Result of a batch download, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadReport {
    pub succeeded: Vec<DownloadOutcome>,
    pub failed: Vec<FailedDownload>,
    /// URLs never started because shutdown was requested
    #[serde(default)]
    pub skipped: Vec<String>,
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    url: &'a str,
    file: &'a str,
    bytes: u64,
    sha256: &'a str,
}

impl DownloadReport {
    pub fn total_bytes(&self) -> u64 {
        self.succeeded.iter().map(|o| o.bytes).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    /// Write `manifest.json` into `dir` listing every successful download
    pub fn write_manifest(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let entries: Vec<ManifestEntry<'_>> = self
            .succeeded
            .iter()
            .map(|o| ManifestEntry {
                url: &o.url,
                file: o
                    .path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default(),
                bytes: o.bytes,
                sha256: &o.sha256,
            })
            .collect();

        let path = dir.as_ref().join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, bytes: u64) -> DownloadOutcome {
        DownloadOutcome {
            url: format!("https://host/{name}"),
            path: PathBuf::from("data").join(name),
            bytes,
            chunks: 1,
            sha256: "ab".repeat(32),
        }
    }

    #[test]
    fn test_report_totals() {
        let report = DownloadReport {
            succeeded: vec![outcome("a.h5", 10), outcome("b.h5", 32)],
            failed: vec![],
            skipped: vec![],
        };
        assert_eq!(report.total_bytes(), 42);
        assert!(report.is_complete());
    }

    #[test]
    fn test_manifest_lists_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let report = DownloadReport {
            succeeded: vec![outcome("a.h5", 10)],
            failed: vec![FailedDownload {
                url: "https://host/b.h5".into(),
                reason: "HTTP 404".into(),
            }],
            skipped: vec![],
        };

        let path = report.write_manifest(dir.path()).unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

        let entries = written.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["file"], "a.h5");
        assert_eq!(entries[0]["bytes"], 10);
        assert!(!report.is_complete());
    }
}
