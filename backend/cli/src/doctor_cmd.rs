//! CLI Doctor Command
//!
//! Checks the configuration, the external OCR and audio tools, and the
//! optional Slack/TTS credentials.

use std::env;
use std::path::{Path, PathBuf};

use ablage_config::{AblageConfig, ValidationReport};
use anyhow::{bail, Result};
use tokio::process::Command;

use crate::terminal_output::{note_error, note_info, note_success, note_warn};

/// Executes the full doctor diagnosis.
pub async fn run(config: &AblageConfig, report: &ValidationReport) -> Result<()> {
    println!("\nablage doctor\n");

    let mut is_ok = check_config(report);
    is_ok &= check_ocr(config).await;
    is_ok &= check_player(config);
    check_credentials(config);

    println!();
    if is_ok {
        note_success("Alle Prüfungen bestanden.");
        Ok(())
    } else {
        bail!("some checks failed, see above")
    }
}

fn check_config(report: &ValidationReport) -> bool {
    println!("Konfiguration:");
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for err in &report.errors {
        note_error(&format!("{}: {}", err.path, err.message));
    }
    if report.is_valid() {
        note_success("gültig");
    }
    report.is_valid()
}

async fn check_ocr(config: &AblageConfig) -> bool {
    println!("Texterkennung:");
    let mut all_good = true;

    match find_in_path(&config.ocr.pdftoppm) {
        Some(path) => note_success(&format!("pdftoppm gefunden: {}", path.display())),
        None => {
            note_error(&format!("'{}' nicht gefunden (Paket poppler-utils)", config.ocr.pdftoppm));
            all_good = false;
        }
    }

    if find_in_path(&config.ocr.tesseract).is_none() {
        note_error(&format!("'{}' nicht gefunden (Paket tesseract-ocr)", config.ocr.tesseract));
        return false;
    }
    match Command::new(&config.ocr.tesseract).arg("--list-langs").output().await {
        Ok(output) => {
            // Older releases print the list on stderr.
            let listing = format!(
                "{}{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
            if lists_language(&listing, &config.ocr.language) {
                note_success(&format!("tesseract mit Sprache '{}'", config.ocr.language));
            } else {
                note_error(&format!(
                    "tesseract ohne Sprachpaket '{}' (z.B. tesseract-ocr-{})",
                    config.ocr.language, config.ocr.language
                ));
                all_good = false;
            }
        }
        Err(e) => {
            note_error(&format!("tesseract nicht ausführbar: {e}"));
            all_good = false;
        }
    }

    all_good
}

fn check_player(config: &AblageConfig) -> bool {
    println!("Sprachausgabe:");
    let Some(program) = config.narration.player.first() else {
        note_error("kein Audio-Player konfiguriert");
        return false;
    };
    match find_in_path(program) {
        Some(path) => {
            note_success(&format!("Player gefunden: {}", path.display()));
            true
        }
        None if config.narration.api_key.is_none() => {
            // Only needed for --tts.
            note_warn(&format!("'{program}' nicht gefunden (nur für --tts nötig)"));
            true
        }
        None => {
            note_error(&format!("'{program}' nicht gefunden"));
            false
        }
    }
}

fn check_credentials(config: &AblageConfig) {
    println!("Zugangsdaten:");
    if config.slack.credentials().is_some() {
        note_success("Slack-Token und Kanal gesetzt");
    } else {
        note_info("Slack nicht konfiguriert (SLACK_TOKEN, SLACK_CHANNEL)");
    }
    if config.narration.api_key.is_some() {
        note_success(&format!("TTS-Schlüssel für {:?} gesetzt", config.narration.provider));
    } else {
        note_info("TTS nicht konfiguriert (OPENAI_API_KEY oder ELEVENLABS_API_KEY)");
    }
}

/// Whether a `tesseract --list-langs` listing contains `language`.
fn lists_language(listing: &str, language: &str) -> bool {
    listing
        .lines()
        .filter(|line| !line.starts_with("List of available languages"))
        .any(|line| line.trim() == language)
}

/// Resolve a program the way the shell would: paths as given, bare names
/// through `$PATH`.
fn find_in_path(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|full| full.is_file())
}
