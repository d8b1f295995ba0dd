/// In-memory record of kept files that were already processed.
///
/// With `keep` the source stays in the hotfolder; the ledger lets the monitor
/// skip it until its size or mtime changes. Nothing is persisted.
use std::collections::{HashMap, HashSet};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    size: u64,
    modified: Option<SystemTime>,
}

impl Fingerprint {
    fn of(meta: &Metadata) -> Self {
        Self {
            size: meta.len(),
            modified: meta.modified().ok(),
        }
    }
}

#[derive(Debug, Default)]
pub struct KeptFileLedger {
    entries: HashMap<PathBuf, Fingerprint>,
}

impl KeptFileLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `path` as processed in the state described by `meta`.
    pub fn record(&mut self, path: &Path, meta: &Metadata) {
        self.entries.insert(path.to_path_buf(), Fingerprint::of(meta));
    }

    pub fn is_unchanged(&self, path: &Path, meta: &Metadata) -> bool {
        self.entries
            .get(path)
            .is_some_and(|fp| *fp == Fingerprint::of(meta))
    }

    /// Forget files that have left the folder.
    pub fn retain_seen(&mut self, seen: &HashSet<PathBuf>) {
        self.entries.retain(|path, _| seen.contains(path));
    }
}
