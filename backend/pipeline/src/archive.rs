//! Archival of processed documents under `<root>/<author>/`.

use std::fs::{File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use ablage_config::{ArchiveConfig, CollisionPolicy};
use ablage_core::{DocumentType, IntakeError, UNKNOWN_AUTHOR};
use chrono::{Local, NaiveDateTime};
use tokio::fs;
use tracing::{debug, warn};

/// Upper bound for archive file names, in characters.
pub const MAX_FILE_NAME_LEN: usize = 32;

/// Second-granularity timestamp embedded in archive file names.
pub const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Replace every character outside `[A-Za-z0-9_.-]` with `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `<type>_<timestamp>_<base name>`, sanitized and cut to
/// [`MAX_FILE_NAME_LEN`].
pub fn archive_file_name(label: &str, source_name: &str, at: NaiveDateTime) -> String {
    let candidate = format!("{label}_{}_{source_name}", at.format(TIMESTAMP_FORMAT));
    let mut name = sanitize(&candidate);
    // ASCII only after sanitizing, so byte and char lengths agree.
    name.truncate(MAX_FILE_NAME_LEN);
    name
}

/// Directory name for an author. Never empty, `.` or `..`.
pub fn author_dir(author: &str) -> String {
    let dir = sanitize(author);
    if dir.chars().all(|c| c == '.') {
        UNKNOWN_AUTHOR.to_string()
    } else {
        dir
    }
}

/// `name` with its tail replaced by `_<n>`, still within the length limit.
fn suffixed(name: &str, n: u32) -> String {
    let suffix = format!("_{n}");
    let keep = name.len().min(MAX_FILE_NAME_LEN.saturating_sub(suffix.len()));
    format!("{}{suffix}", &name[..keep])
}

pub struct Archiver {
    root: PathBuf,
    on_collision: CollisionPolicy,
}

impl Archiver {
    pub fn new(root: impl Into<PathBuf>, on_collision: CollisionPolicy) -> Self {
        Self {
            root: root.into(),
            on_collision,
        }
    }

    pub fn from_config(config: &ArchiveConfig) -> Self {
        Self::new(config.root.clone(), config.on_collision)
    }

    /// Move (or with `keep`, copy) `source` into the archive.
    pub async fn archive(
        &self,
        source: &Path,
        document_type: DocumentType,
        author: &str,
        keep: bool,
    ) -> Result<PathBuf, IntakeError> {
        self.archive_at(source, document_type, author, keep, Local::now().naive_local())
            .await
    }

    pub async fn archive_at(
        &self,
        source: &Path,
        document_type: DocumentType,
        author: &str,
        keep: bool,
        at: NaiveDateTime,
    ) -> Result<PathBuf, IntakeError> {
        let source_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = archive_file_name(document_type.label(), &source_name, at);

        let dir = self.root.join(author_dir(author));
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| IntakeError::archive(&dir, e))?;

        let dest = match self.on_collision {
            CollisionPolicy::Overwrite => dir.join(&file_name),
            CollisionPolicy::Suffix => free_destination(&dir, &file_name)
                .await
                .map_err(|e| IntakeError::archive(&dir, e))?,
        };

        let result = if keep {
            copy_preserving(source, &dest).await
        } else {
            move_file(source, &dest).await
        };
        result.map_err(|e| IntakeError::archive(source, e))?;

        debug!(from = %source.display(), to = %dest.display(), keep, "Archived");
        Ok(dest)
    }
}

async fn free_destination(dir: &Path, file_name: &str) -> io::Result<PathBuf> {
    let first = dir.join(file_name);
    if !fs::try_exists(&first).await? {
        return Ok(first);
    }
    let mut n = 1;
    loop {
        let candidate = dir.join(suffixed(file_name, n));
        if !fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        n += 1;
    }
}

async fn move_file(source: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(source, dest).await {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(from = %source.display(), "Cross-device move, copying instead");
            copy_then_remove(source, dest).await
        }
        result => result,
    }
}

/// Copy, then delete the source. Once the copy exists the document counts
/// as archived, so a failed delete is only logged.
async fn copy_then_remove(source: &Path, dest: &Path) -> io::Result<()> {
    copy_preserving(source, dest).await?;
    if let Err(e) = fs::remove_file(source).await {
        warn!(error = %e, path = %source.display(), "Archived copy written but source not removed");
    }
    Ok(())
}

/// Copy content, permissions, and access/modification times.
async fn copy_preserving(source: &Path, dest: &Path) -> io::Result<()> {
    let source = source.to_path_buf();
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || {
        std::fs::copy(&source, &dest)?;
        let meta = std::fs::metadata(&source)?;
        let times = FileTimes::new()
            .set_accessed(meta.accessed()?)
            .set_modified(meta.modified()?);
        File::options().write(true).open(&dest)?.set_times(times)
    })
    .await
    .map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(12, 30, 45)
            .unwrap()
    }

    fn is_safe(name: &str) -> bool {
        name.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    }

    #[test]
    fn sanitize_replaces_each_foreign_char() {
        assert_eq!(sanitize("Brief an Müller (2).pdf"), "Brief_an_M_ller__2_.pdf");
        assert_eq!(sanitize("ok-name_1.pdf"), "ok-name_1.pdf");
    }

    #[test]
    fn file_names_are_short_and_safe() {
        let sources = [
            "a.pdf",
            "Scan vom Amt für Steuern 2024 – endgültig.pdf",
            "😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀😀.pdf",
            "",
        ];
        for doc_type in [
            DocumentType::Invoice,
            DocumentType::Notice,
            DocumentType::Termination,
            DocumentType::Miscellaneous,
        ] {
            for source in sources {
                let name = archive_file_name(doc_type.label(), source, noon());
                assert!(name.len() <= MAX_FILE_NAME_LEN, "{name}");
                assert!(is_safe(&name), "{name}");
            }
        }
    }

    #[test]
    fn long_candidates_are_cut_to_exactly_the_limit() {
        let name = archive_file_name("Rechnung", "scan.pdf", noon());
        assert_eq!(name, "Rechnung_2024_01_02_123045_scan.");
        assert_eq!(name.len(), MAX_FILE_NAME_LEN);

        let short = archive_file_name("Bescheid", "a.pdf", noon());
        assert_eq!(short, "Bescheid_2024_01_02_123045_a.pdf");
    }

    #[test]
    fn umlaut_label_is_sanitized() {
        let name = archive_file_name("Kündigung", "x.pdf", noon());
        assert!(name.starts_with("K_ndigung_2024_01_02"), "{name}");
    }

    #[test]
    fn author_dir_never_escapes_root() {
        assert_eq!(author_dir("Max Mustermann"), "Max_Mustermann");
        assert_eq!(author_dir(""), UNKNOWN_AUTHOR);
        assert_eq!(author_dir(".."), UNKNOWN_AUTHOR);
        assert_eq!(author_dir("../etc"), ".._etc");
        assert_eq!(author_dir(" Amt "), "_Amt_");
    }

    #[test]
    fn suffix_keeps_length() {
        let name = "Rechnung_2024_01_02_123045_scan.";
        let s = suffixed(name, 1);
        assert_eq!(s, "Rechnung_2024_01_02_123045_sca_1");
        assert_eq!(s.len(), MAX_FILE_NAME_LEN);
        assert_eq!(suffixed("kurz", 12), "kurz_12");
    }

    #[tokio::test]
    async fn move_removes_source() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("brief.pdf");
        std::fs::write(&source, b"%PDF-1.4").unwrap();
        let archiver = Archiver::new(tmp.path().join("archive"), CollisionPolicy::Suffix);

        let dest = archiver
            .archive(&source, DocumentType::Invoice, "Stadtwerke", false)
            .await
            .unwrap();

        assert!(!source.exists());
        assert!(dest.exists());
        assert_eq!(dest.parent().unwrap(), tmp.path().join("archive").join("Stadtwerke"));
        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn keep_copies_and_preserves_mtime() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("brief.pdf");
        std::fs::write(&source, b"%PDF-1.4").unwrap();
        let old = SystemTime::now() - Duration::from_secs(86_400);
        File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_times(FileTimes::new().set_modified(old))
            .unwrap();

        let archiver = Archiver::new(tmp.path().join("archive"), CollisionPolicy::Suffix);
        let dest = archiver
            .archive(&source, DocumentType::Notice, UNKNOWN_AUTHOR, true)
            .await
            .unwrap();

        assert!(source.exists());
        assert!(dest.exists());
        let copied = std::fs::metadata(&dest).unwrap().modified().unwrap();
        let original = std::fs::metadata(&source).unwrap().modified().unwrap();
        assert_eq!(copied, original);
    }

    #[tokio::test]
    async fn same_second_collisions_get_suffixes() {
        let tmp = TempDir::new().unwrap();
        let archiver = Archiver::new(tmp.path().join("archive"), CollisionPolicy::Suffix);
        let mut seen = Vec::new();
        for i in 0..3 {
            let source = tmp.path().join("scan.pdf");
            std::fs::write(&source, format!("doc {i}")).unwrap();
            let dest = archiver
                .archive_at(&source, DocumentType::Invoice, "A", false, noon())
                .await
                .unwrap();
            seen.push(dest);
        }
        let names: Vec<String> = seen
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            [
                "Rechnung_2024_01_02_123045_scan.",
                "Rechnung_2024_01_02_123045_sca_1",
                "Rechnung_2024_01_02_123045_sca_2",
            ]
        );
        assert_eq!(std::fs::read_to_string(&seen[0]).unwrap(), "doc 0");
    }

    #[tokio::test]
    async fn overwrite_policy_replaces_prior_entry() {
        let tmp = TempDir::new().unwrap();
        let archiver = Archiver::new(tmp.path().join("archive"), CollisionPolicy::Overwrite);
        let mut archived = Vec::new();
        for i in 0..2 {
            let source = tmp.path().join("scan.pdf");
            std::fs::write(&source, format!("doc {i}")).unwrap();
            archived.push(
                archiver
                    .archive_at(&source, DocumentType::Invoice, "A", false, noon())
                    .await
                    .unwrap(),
            );
        }
        assert_eq!(archived[0], archived[1]);
        let last = &archived[1];
        let entries = std::fs::read_dir(last.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
        assert_eq!(std::fs::read_to_string(last).unwrap(), "doc 1");
    }

    #[tokio::test]
    async fn copy_then_remove_moves_content_and_times() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("brief.pdf");
        let dest = tmp.path().join("kopie.pdf");
        std::fs::write(&source, b"%PDF-1.4").unwrap();
        let old = SystemTime::now() - Duration::from_secs(3_600);
        File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_times(FileTimes::new().set_modified(old))
            .unwrap();
        let modified = std::fs::metadata(&source).unwrap().modified().unwrap();

        copy_then_remove(&source, &dest).await.unwrap();

        assert!(!source.exists());
        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.4");
        assert_eq!(std::fs::metadata(&dest).unwrap().modified().unwrap(), modified);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_source_removal_still_counts_as_archived() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let inbox = tmp.path().join("eingang");
        std::fs::create_dir(&inbox).unwrap();
        let source = inbox.join("brief.pdf");
        std::fs::write(&source, b"%PDF-1.4").unwrap();
        let dest = tmp.path().join("kopie.pdf");

        // A read-only directory forbids unlinking its entries.
        std::fs::set_permissions(&inbox, std::fs::Permissions::from_mode(0o555)).unwrap();
        let result = copy_then_remove(&source, &dest).await;
        std::fs::set_permissions(&inbox, std::fs::Permissions::from_mode(0o755)).unwrap();

        // Under root the delete succeeds anyway; the call reports success either way.
        result.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn missing_source_is_an_archive_error() {
        let tmp = TempDir::new().unwrap();
        let archiver = Archiver::new(tmp.path().join("archive"), CollisionPolicy::Suffix);
        let err = archiver
            .archive(&tmp.path().join("gone.pdf"), DocumentType::Invoice, "A", false)
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Archive { .. }));
    }
}
