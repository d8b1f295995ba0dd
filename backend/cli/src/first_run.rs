//! One-time installation hint for the external OCR tools.

use std::path::{Path, PathBuf};

use crate::terminal_output::hint;

const SENTINEL_NAME: &str = ".ablage_initialized";

const INSTALL_HINT: &str = "Erste Ausführung erkannt. Für die Texterkennung werden Tesseract \
(mit deutschem Sprachpaket) und Poppler benötigt:
    Debian/Ubuntu: sudo apt install tesseract-ocr tesseract-ocr-deu poppler-utils
    macOS:         brew install tesseract tesseract-lang poppler
Mit `ablage doctor` lässt sich die Installation prüfen.";

fn sentinel_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(SENTINEL_NAME))
}

/// Print the install hint unless the sentinel exists, then create it.
pub fn check_first_run() {
    if let Some(sentinel) = sentinel_path() {
        check_first_run_at(&sentinel);
    }
}

/// Returns whether the hint was shown.
fn check_first_run_at(sentinel: &Path) -> bool {
    if sentinel.exists() {
        return false;
    }
    hint(INSTALL_HINT);
    // Shown again next time if this fails.
    let _ = std::fs::write(sentinel, b"");
    true
}
