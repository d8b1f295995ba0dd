/// Hotfolder monitor: polls a directory and runs every PDF through the
/// pipeline, one at a time.
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ablage_config::{HotfolderConfig, KeptFilePolicy};
use ablage_pipeline::{Pipeline, ProcessOptions};
use anyhow::{Context, Result};
use tokio::{fs, time};
use tracing::{debug, error, info};

use crate::ledger::KeptFileLedger;

/// Outcome counts of one scan cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Case-insensitive `.pdf` name check.
pub fn is_pdf_name(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false)
}

pub struct Hotfolder<'a> {
    dir: PathBuf,
    interval: Duration,
    pipeline: &'a Pipeline,
    options: ProcessOptions,
    policy: KeptFilePolicy,
    ledger: KeptFileLedger,
}

impl<'a> Hotfolder<'a> {
    pub fn new(
        dir: impl Into<PathBuf>,
        interval: Duration,
        pipeline: &'a Pipeline,
        options: ProcessOptions,
    ) -> Self {
        Self {
            dir: dir.into(),
            interval,
            pipeline,
            options,
            policy: KeptFilePolicy::default(),
            ledger: KeptFileLedger::new(),
        }
    }

    pub fn from_config(
        config: &HotfolderConfig,
        pipeline: &'a Pipeline,
        options: ProcessOptions,
    ) -> Self {
        Self::new(
            config.path.clone(),
            Duration::from_secs(config.interval_secs),
            pipeline,
            options,
        )
        .with_policy(config.kept_files)
    }

    pub fn with_policy(mut self, policy: KeptFilePolicy) -> Self {
        self.policy = policy;
        self
    }

    fn tracks_kept_files(&self) -> bool {
        self.options.keep && self.policy == KeptFilePolicy::SkipUnchanged
    }

    /// Scan the folder once. Per-file failures are logged and counted; only a
    /// folder that cannot be opened is returned as an error. A failed entry
    /// read ends the cycle early with the counts so far.
    pub async fn scan_once(&mut self) -> Result<CycleReport> {
        let mut report = CycleReport::default();
        let mut seen = HashSet::new();
        let mut entries = fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("listing {}", self.dir.display()))?;

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    error!(dir = %self.dir.display(), error = %e, "Failed to read hotfolder entry");
                    break;
                }
            };
            let path = entry.path();
            if !is_pdf_name(&path) {
                continue;
            }
            let meta = match fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => meta,
                _ => continue,
            };
            seen.insert(path.clone());

            if self.tracks_kept_files() && self.ledger.is_unchanged(&path, &meta) {
                debug!(path = %path.display(), "Unchanged kept file, skipping");
                report.skipped += 1;
                continue;
            }

            match self.pipeline.process(&path, &self.options).await {
                Ok(_) => {
                    report.processed += 1;
                    if self.tracks_kept_files() {
                        self.ledger.record(&path, &meta);
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    error!(path = %path.display(), error = %e, "Failed to process document");
                }
            }
        }

        self.ledger.retain_seen(&seen);
        Ok(report)
    }

    /// Poll forever. Creates the folder first; returns only if that fails.
    pub async fn run(mut self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating hotfolder {}", self.dir.display()))?;
        info!(
            dir = %self.dir.display(),
            interval_secs = self.interval.as_secs(),
            keep = self.options.keep,
            "Watching hotfolder"
        );

        loop {
            match self.scan_once().await {
                Ok(report) => info!(
                    processed = report.processed,
                    failed = report.failed,
                    skipped = report.skipped,
                    "Scan cycle complete"
                ),
                Err(e) => error!(error = %e, "Failed to scan hotfolder"),
            }
            time::sleep(self.interval).await;
        }
    }
}
