//! Append-only NDJSON log of summary records.
//!
//! One JSON object per line; the file is never truncated or rewritten.

use std::path::{Path, PathBuf};

use ablage_core::{IntakeError, SummaryRecord};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub struct SummaryLog {
    path: PathBuf,
}

impl SummaryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single line, creating the file and its parent
    /// directory on demand.
    pub async fn append(&self, record: &SummaryRecord) -> Result<(), IntakeError> {
        let mut line = serde_json::to_string(record)
            .map_err(|e| IntakeError::SummaryLog(std::io::Error::other(e)))?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(IntakeError::SummaryLog)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(IntakeError::SummaryLog)?;
        file.write_all(line.as_bytes())
            .await
            .map_err(IntakeError::SummaryLog)?;
        file.flush().await.map_err(IntakeError::SummaryLog)?;

        debug!(path = %self.path.display(), "Appended summary record");
        Ok(())
    }
}
