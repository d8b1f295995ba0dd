//! Config validation with user-friendly error messages.

use thiserror::Error;

use crate::schema::AblageConfig;

/// A config validation finding with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &AblageConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_hotfolder(config, &mut report);
    validate_archive(config, &mut report);
    validate_logging(config, &mut report);
    validate_ocr(config, &mut report);
    validate_slack(config, &mut report);
    validate_narration(config, &mut report);
    report
}

fn validate_hotfolder(config: &AblageConfig, report: &mut ValidationReport) {
    if config.hotfolder.interval_secs == 0 {
        report.error("hotfolder.intervalSecs", "Polling interval must be > 0");
    }
    if config.hotfolder.path.as_os_str().is_empty() {
        report.error("hotfolder.path", "Hotfolder path cannot be empty");
    }
}

fn validate_archive(config: &AblageConfig, report: &mut ValidationReport) {
    if config.archive.root.as_os_str().is_empty() {
        report.error("archive.root", "Archive root cannot be empty");
    } else if config.archive.root == config.hotfolder.path {
        report.error(
            "archive.root",
            "Archive root must differ from the hotfolder, or archived files are rescanned",
        );
    }
}

fn validate_logging(config: &AblageConfig, report: &mut ValidationReport) {
    if config.logging.dir.as_os_str().is_empty() {
        report.error("logging.dir", "Log directory cannot be empty");
    }
    if config.logging.summary_file.trim().is_empty() {
        report.error("logging.summaryFile", "Summary log file name cannot be empty");
    }
    if config.logging.event_file.trim().is_empty() {
        report.error("logging.eventFile", "Event log file name cannot be empty");
    }
}

fn validate_ocr(config: &AblageConfig, report: &mut ValidationReport) {
    let dpi = config.ocr.dpi;
    if dpi == 0 {
        report.error("ocr.dpi", "Rasterization dpi must be > 0");
    } else if !(150..=600).contains(&dpi) {
        report.warn(
            "ocr.dpi",
            format!("{dpi} dpi is unusual for OCR; 300 is recommended"),
        );
    }
    if config.ocr.language.trim().is_empty() {
        report.error("ocr.language", "OCR language cannot be empty");
    }
}

fn validate_slack(config: &AblageConfig, report: &mut ValidationReport) {
    let has = |v: &Option<String>| v.as_deref().map(|s| !s.is_empty()).unwrap_or(false);
    match (has(&config.slack.token), has(&config.slack.channel)) {
        (true, false) => report.warn(
            "slack.channel",
            "Slack token is set but no channel; notifications are disabled",
        ),
        (false, true) => report.warn(
            "slack.token",
            "Slack channel is set but no token; notifications are disabled",
        ),
        _ => {}
    }
}

fn validate_narration(config: &AblageConfig, report: &mut ValidationReport) {
    if config.narration.player.first().map(|p| p.trim().is_empty()).unwrap_or(true) {
        report.error("narration.player", "Audio player command cannot be empty");
    }
}
