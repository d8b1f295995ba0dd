//! Ablage runtime configuration schema.
//!
//! Every section has serde defaults so an empty (or missing) YAML file yields
//! a runnable configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AblageConfig {
    #[serde(default)]
    pub hotfolder: HotfolderConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub ocr: OcrConfig,

    #[serde(default)]
    pub slack: SlackConfig,

    #[serde(default)]
    pub narration: NarrationConfig,
}

// ---------------------------------------------------------------------------
// Hotfolder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotfolderConfig {
    #[serde(default = "default_hotfolder_path")]
    pub path: PathBuf,

    /// Pause between two directory scans.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// What to do with files left in place by `keep`.
    #[serde(default)]
    pub kept_files: KeptFilePolicy,
}

impl Default for HotfolderConfig {
    fn default() -> Self {
        Self {
            path: default_hotfolder_path(),
            interval_secs: default_interval_secs(),
            kept_files: KeptFilePolicy::default(),
        }
    }
}

/// Handling of successfully processed files that remain in the hotfolder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeptFilePolicy {
    /// Skip a kept file until its size or modification time changes.
    #[default]
    SkipUnchanged,
    /// Feed every kept file through the pipeline again on every scan.
    Reprocess,
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveConfig {
    #[serde(default = "default_archive_root")]
    pub root: PathBuf,

    #[serde(default)]
    pub on_collision: CollisionPolicy,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            root: default_archive_root(),
            on_collision: CollisionPolicy::default(),
        }
    }
}

/// What the archiver does when the chosen filename already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollisionPolicy {
    /// Replace the tail of the name with `_<n>` until it is free.
    #[default]
    Suffix,
    /// Replace the existing archive entry.
    Overwrite,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,

    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Append-only NDJSON file of summary records.
    #[serde(default = "default_summary_file")]
    pub summary_file: String,

    /// Prefix of the daily-rotated human-readable event log.
    #[serde(default = "default_event_file")]
    pub event_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            level: default_log_level(),
            summary_file: default_summary_file(),
            event_file: default_event_file(),
        }
    }
}

impl LoggingConfig {
    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(&self.summary_file)
    }
}

// ---------------------------------------------------------------------------
// OCR
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrConfig {
    /// Tesseract language pack.
    #[serde(default = "default_ocr_language")]
    pub language: String,

    /// Rasterization resolution handed to pdftoppm.
    #[serde(default = "default_ocr_dpi")]
    pub dpi: u32,

    #[serde(default = "default_pdftoppm")]
    pub pdftoppm: String,

    #[serde(default = "default_tesseract")]
    pub tesseract: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_ocr_language(),
            dpi: default_ocr_dpi(),
            pdftoppm: default_pdftoppm(),
            tesseract: default_tesseract(),
        }
    }
}

// ---------------------------------------------------------------------------
// Slack
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl SlackConfig {
    /// Token and channel, when both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.token.as_deref(), self.channel.as_deref()) {
            (Some(token), Some(channel)) if !token.is_empty() && !channel.is_empty() => {
                Some((token, channel))
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Narration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationConfig {
    #[serde(default)]
    pub provider: TtsProviderChoice,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,

    /// Player argv; the audio file path is appended.
    #[serde(default = "default_player")]
    pub player: Vec<String>,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            provider: TtsProviderChoice::default(),
            api_key: None,
            voice: None,
            player: default_player(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TtsProviderChoice {
    #[default]
    OpenAi,
    ElevenLabs,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_hotfolder_path() -> PathBuf {
    PathBuf::from("hotfolder")
}

fn default_interval_secs() -> u64 {
    5
}

fn default_archive_root() -> PathBuf {
    PathBuf::from("archive")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_summary_file() -> String {
    "summary.jsonl".to_string()
}

fn default_event_file() -> String {
    "ablage.log".to_string()
}

fn default_ocr_language() -> String {
    "deu".to_string()
}

fn default_ocr_dpi() -> u32 {
    300
}

fn default_pdftoppm() -> String {
    "pdftoppm".to_string()
}

fn default_tesseract() -> String {
    "tesseract".to_string()
}

fn default_player() -> Vec<String> {
    vec!["mpg123".to_string(), "-q".to_string()]
}
