//! One document through the whole intake: OCR, understanding, archival,
//! summary log, then best-effort notification and narration.

use std::path::Path;
use std::time::Instant;

use ablage_channels::intake_message;
use ablage_config::AblageConfig;
use ablage_core::{
    Collaborator, Document, IntakeError, MetadataReader, Narrator, Notifier, SummaryRecord, Task,
    TextExtractor,
};
use ablage_logging::SummaryLog;
use ablage_tts::narration_text;
use ablage_understanding::{classify, extract_tasks, summarize, DEFAULT_MAX_SENTENCES};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::archive::Archiver;

/// Per-run switches from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    pub keep: bool,
    pub narrate: bool,
}

pub struct Pipeline {
    extractor: Box<dyn TextExtractor>,
    metadata: Box<dyn MetadataReader>,
    notifier: Collaborator<dyn Notifier>,
    narrator: Collaborator<dyn Narrator>,
    archiver: Archiver,
    summary_log: SummaryLog,
    max_sentences: usize,
}

impl Pipeline {
    pub fn new(
        config: &AblageConfig,
        extractor: Box<dyn TextExtractor>,
        metadata: Box<dyn MetadataReader>,
    ) -> Self {
        Self {
            extractor,
            metadata,
            notifier: Collaborator::unavailable("notification not configured"),
            narrator: Collaborator::unavailable("narration not configured"),
            archiver: Archiver::from_config(&config.archive),
            summary_log: SummaryLog::new(config.logging.summary_path()),
            max_sentences: DEFAULT_MAX_SENTENCES,
        }
    }

    pub fn with_notifier(mut self, notifier: Collaborator<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_narrator(mut self, narrator: Collaborator<dyn Narrator>) -> Self {
        self.narrator = narrator;
        self
    }

    pub fn summary_log(&self) -> &SummaryLog {
        &self.summary_log
    }

    /// Run the intake for one PDF.
    ///
    /// Extraction, archival and summary-log failures are returned; the source
    /// file is untouched when extraction fails. Notification and narration
    /// failures are only logged.
    pub async fn process(
        &self,
        pdf: &Path,
        options: &ProcessOptions,
    ) -> Result<SummaryRecord, IntakeError> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        info!(%run_id, path = %pdf.display(), engine = self.extractor.name(), "Processing document");

        let text = self.extractor.extract_text(pdf).await?;
        debug!(%run_id, chars = text.chars().count(), "Text extracted");

        let document_type = classify(&text);
        let tasks = extract_tasks(&text);
        let author = self.metadata.author_of(pdf).await;

        let archived = self
            .archiver
            .archive(pdf, document_type, &author, options.keep)
            .await?;
        let summary = summarize(&text, self.max_sentences);

        let document = Document {
            source: pdf.to_path_buf(),
            text,
            document_type,
            author,
            tasks,
            summary,
            archived,
        };
        let record = document.summary_record();
        self.summary_log.append(&record).await?;

        info!(%run_id, "Dokumenttyp: {}", document.document_type);
        info!(%run_id, "Gespeichert unter: {}", document.archived.display());
        info!(
            %run_id,
            "Gefundene Aufgaben: {}",
            serde_json::to_string(&document.tasks).unwrap_or_else(|_| "[]".to_string())
        );

        self.notify(run_id, &document).await;
        if options.narrate {
            self.narrate(run_id, &document.tasks).await;
        }

        info!(
            %run_id,
            author = %document.author,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Document processed"
        );
        Ok(record)
    }

    async fn notify(&self, run_id: Uuid, document: &Document) {
        // An unconfigured notifier is the normal case.
        let Ok(notifier) = self.notifier.get() else {
            return;
        };
        let message = intake_message(document.document_type, &document.tasks);
        match notifier.notify(&message).await {
            Ok(()) => debug!(%run_id, channel = notifier.name(), "Notification sent"),
            Err(e) => warn!(%run_id, channel = notifier.name(), error = %e, "Notification failed"),
        }
    }

    async fn narrate(&self, run_id: Uuid, tasks: &[Task]) {
        let narrator = match self.narrator.get() {
            Ok(narrator) => narrator,
            Err(reason) => {
                warn!(%run_id, reason, "Narration requested but unavailable");
                return;
            }
        };
        if let Err(e) = narrator.narrate(&narration_text(tasks)).await {
            warn!(%run_id, error = %e, "Narration failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ablage_core::{DocumentType, UNKNOWN_AUTHOR};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    const INVOICE: &str = "Rechnung Nr. 5. Bitte Zahlung leisten bis 31.12.2024.";

    struct FixedText(&'static str);

    #[async_trait]
    impl TextExtractor for FixedText {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn extract_text(&self, _pdf: &Path) -> Result<String, IntakeError> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenOcr;

    #[async_trait]
    impl TextExtractor for BrokenOcr {
        fn name(&self) -> &str {
            "broken"
        }

        async fn extract_text(&self, pdf: &Path) -> Result<String, IntakeError> {
            Err(IntakeError::extraction(pdf, "page 1 unreadable"))
        }
    }

    struct Author(&'static str);

    #[async_trait]
    impl MetadataReader for Author {
        async fn author_of(&self, _pdf: &Path) -> String {
            self.0.to_string()
        }
    }

    #[derive(Clone, Default)]
    struct Recording(Arc<Mutex<Vec<String>>>);

    #[async_trait]
    impl Notifier for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        async fn notify(&self, text: &str) -> Result<(), IntakeError> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[async_trait]
    impl Narrator for Recording {
        async fn narrate(&self, text: &str) -> Result<(), IntakeError> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl Notifier for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn notify(&self, _text: &str) -> Result<(), IntakeError> {
            Err(IntakeError::Notification("channel_not_found".into()))
        }
    }

    #[async_trait]
    impl Narrator for Failing {
        async fn narrate(&self, _text: &str) -> Result<(), IntakeError> {
            Err(IntakeError::Narration("no audio device".into()))
        }
    }

    fn config(tmp: &TempDir) -> AblageConfig {
        let mut config = AblageConfig::default();
        config.hotfolder.path = tmp.path().join("hotfolder");
        config.archive.root = tmp.path().join("archive");
        config.logging.dir = tmp.path().join("logs");
        config
    }

    fn scan(tmp: &TempDir, name: &str) -> std::path::PathBuf {
        let dir = tmp.path().join("hotfolder");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        path
    }

    fn log_lines(pipeline: &Pipeline) -> Vec<SummaryRecord> {
        std::fs::read_to_string(pipeline.summary_log().path())
            .unwrap_or_default()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn invoice_is_classified_archived_and_logged() {
        let tmp = TempDir::new().unwrap();
        let pdf = scan(&tmp, "scan.pdf");
        let pipeline = Pipeline::new(&config(&tmp), Box::new(FixedText(INVOICE)), Box::new(Author("Stadtwerke")));

        let record = pipeline.process(&pdf, &ProcessOptions::default()).await.unwrap();

        assert_eq!(record.document_type, DocumentType::Invoice);
        assert_eq!(record.tasks.len(), 1);
        assert_eq!(record.tasks[0].due, "31.12.2024");
        assert_eq!(record.tasks[0].task, "Bitte Zahlung leisten");
        assert_eq!(record.author, "Stadtwerke");
        assert_eq!(record.pdf, pdf.display().to_string());
        assert!(!pdf.exists());

        let archived = Path::new(&record.archived);
        assert!(archived.exists());
        assert!(archived.starts_with(tmp.path().join("archive").join("Stadtwerke")));
        let name = archived.file_name().unwrap().to_str().unwrap();
        assert!(name.len() <= 32 && name.starts_with("Rechnung_"), "{name}");

        assert_eq!(log_lines(&pipeline), vec![record]);
    }

    #[tokio::test]
    async fn keep_leaves_source_in_place() {
        let tmp = TempDir::new().unwrap();
        let pdf = scan(&tmp, "scan.pdf");
        let pipeline = Pipeline::new(&config(&tmp), Box::new(FixedText("Hallo.")), Box::new(Author(UNKNOWN_AUTHOR)));

        let options = ProcessOptions { keep: true, narrate: false };
        let record = pipeline.process(&pdf, &options).await.unwrap();

        assert!(pdf.exists());
        assert!(Path::new(&record.archived).exists());
        assert_eq!(record.document_type, DocumentType::Miscellaneous);
        assert!(record.archived.contains(UNKNOWN_AUTHOR));
    }

    #[tokio::test]
    async fn extraction_failure_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let pdf = scan(&tmp, "kaputt.pdf");
        let pipeline = Pipeline::new(&config(&tmp), Box::new(BrokenOcr), Box::new(Author("A")));

        let err = pipeline.process(&pdf, &ProcessOptions::default()).await.unwrap_err();

        assert!(matches!(err, IntakeError::Extraction { .. }));
        assert!(pdf.exists());
        assert!(!tmp.path().join("archive").exists());
        assert!(log_lines(&pipeline).is_empty());
    }

    #[tokio::test]
    async fn summary_log_failure_surfaces_after_archival() {
        let tmp = TempDir::new().unwrap();
        let pdf = scan(&tmp, "scan.pdf");
        // A regular file where the log directory should be.
        std::fs::write(tmp.path().join("logs"), b"").unwrap();
        let pipeline = Pipeline::new(&config(&tmp), Box::new(FixedText(INVOICE)), Box::new(Author("Stadtwerke")));

        let err = pipeline.process(&pdf, &ProcessOptions::default()).await.unwrap_err();

        assert!(matches!(err, IntakeError::SummaryLog(_)), "{err}");
        assert!(!pdf.exists());
        let archived = std::fs::read_dir(tmp.path().join("archive").join("Stadtwerke"))
            .unwrap()
            .count();
        assert_eq!(archived, 1);
    }

    #[tokio::test]
    async fn notifier_and_narrator_receive_task_text() {
        let tmp = TempDir::new().unwrap();
        let pdf = scan(&tmp, "scan.pdf");
        let sent = Recording::default();
        let spoken = Recording::default();
        let pipeline = Pipeline::new(&config(&tmp), Box::new(FixedText(INVOICE)), Box::new(Author("A")))
            .with_notifier(Collaborator::Available(Box::new(sent.clone())))
            .with_narrator(Collaborator::Available(Box::new(spoken.clone())));

        let options = ProcessOptions { keep: false, narrate: true };
        pipeline.process(&pdf, &options).await.unwrap();

        let sent = sent.0.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Dokumenttyp: Rechnung\nAufgaben: "));
        assert!(sent[0].contains("31.12.2024"));

        let spoken = spoken.0.lock().unwrap();
        assert_eq!(spoken.as_slice(), ["Aufgabe: Bitte Zahlung leisten, fällig bis 31.12.2024."]);
    }

    #[tokio::test]
    async fn narration_only_when_requested() {
        let tmp = TempDir::new().unwrap();
        let pdf = scan(&tmp, "scan.pdf");
        let spoken = Recording::default();
        let pipeline = Pipeline::new(&config(&tmp), Box::new(FixedText(INVOICE)), Box::new(Author("A")))
            .with_narrator(Collaborator::Available(Box::new(spoken.clone())));

        pipeline.process(&pdf, &ProcessOptions::default()).await.unwrap();
        assert!(spoken.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn collaborator_failures_do_not_fail_the_run() {
        let tmp = TempDir::new().unwrap();
        let pdf = scan(&tmp, "scan.pdf");
        let pipeline = Pipeline::new(&config(&tmp), Box::new(FixedText(INVOICE)), Box::new(Author("A")))
            .with_notifier(Collaborator::Available(Box::new(Failing)))
            .with_narrator(Collaborator::Available(Box::new(Failing)));

        let options = ProcessOptions { keep: false, narrate: true };
        let record = pipeline.process(&pdf, &options).await.unwrap();
        assert_eq!(log_lines(&pipeline), vec![record]);
    }

    #[tokio::test]
    async fn unavailable_narrator_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let pdf = scan(&tmp, "scan.pdf");
        let pipeline = Pipeline::new(&config(&tmp), Box::new(FixedText(INVOICE)), Box::new(Author("A")));

        let options = ProcessOptions { keep: false, narrate: true };
        assert!(pipeline.process(&pdf, &options).await.is_ok());
    }
}
