use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the intake pipeline.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("text extraction failed for {}: {reason}", .path.display())]
    Extraction { path: PathBuf, reason: String },

    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("archival failed for {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("summary log write failed: {0}")]
    SummaryLog(#[source] std::io::Error),

    #[error("notification failed: {0}")]
    Notification(String),

    #[error("narration failed: {0}")]
    Narration(String),
}

impl IntakeError {
    pub fn extraction(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn archive(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Archive {
            path: path.into(),
            source,
        }
    }
}
