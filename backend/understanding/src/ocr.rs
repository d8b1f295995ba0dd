//! Optical Character Recognition (OCR)
//!
//! Rasterizes a scanned PDF with Poppler's `pdftoppm` and runs the Tesseract
//! CLI on every page image. Both binaries are external collaborators; a
//! missing binary is reported as [`IntakeError::EngineUnavailable`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Output;

use ablage_config::OcrConfig;
use ablage_core::{IntakeError, TextExtractor};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Render every page to `<dir>/page-N.png` and return them in page order.
    async fn rasterize(&self, pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>, IntakeError> {
        let prefix = dir.join("page");
        let output = run(
            Command::new(&self.config.pdftoppm)
                .arg("-r")
                .arg(self.config.dpi.to_string())
                .arg("-png")
                .arg(pdf)
                .arg(&prefix),
            &self.config.pdftoppm,
        )
        .await?;
        check_status(&output, pdf, "pdftoppm")?;

        let mut pages = Vec::new();
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| IntakeError::extraction(pdf, format!("reading page images: {e}")))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| IntakeError::extraction(pdf, format!("reading page images: {e}")))?
        {
            let path = entry.path();
            if let Some(n) = page_number(&path) {
                pages.push((n, path));
            }
        }
        pages.sort_by_key(|(n, _)| *n);
        Ok(pages.into_iter().map(|(_, p)| p).collect())
    }

    async fn recognize(&self, pdf: &Path, image: &Path) -> Result<String, IntakeError> {
        let output = run(
            Command::new(&self.config.tesseract)
                .arg(image)
                .arg("stdout")
                .arg("-l")
                .arg(&self.config.language),
            &self.config.tesseract,
        )
        .await?;
        check_status(&output, pdf, "tesseract")?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl TextExtractor for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn extract_text(&self, pdf: &Path) -> Result<String, IntakeError> {
        info!(path = %pdf.display(), lang = %self.config.language, "Running OCR");

        let workdir = tempfile::tempdir()
            .map_err(|e| IntakeError::extraction(pdf, format!("creating temp dir: {e}")))?;
        let pages = self.rasterize(pdf, workdir.path()).await?;
        if pages.is_empty() {
            return Err(IntakeError::extraction(pdf, "pdftoppm produced no pages"));
        }

        let mut texts = Vec::with_capacity(pages.len());
        for page in &pages {
            debug!(page = %page.display(), "Recognizing page");
            texts.push(self.recognize(pdf, page).await?);
        }

        info!(path = %pdf.display(), pages = pages.len(), "OCR finished");
        Ok(texts.join("\n"))
    }
}

async fn run(command: &mut Command, program: &str) -> Result<Output, IntakeError> {
    command.output().await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            IntakeError::EngineUnavailable(format!(
                "'{program}' not found; install tesseract-ocr (with the language pack) and poppler-utils"
            ))
        } else {
            IntakeError::EngineUnavailable(format!("failed to run '{program}': {e}"))
        }
    })
}

fn check_status(output: &Output, pdf: &Path, program: &str) -> Result<(), IntakeError> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(IntakeError::extraction(
        pdf,
        format!(
            "{program} exited with {}: {}",
            output.status.code().map(|c| c.to_string()).unwrap_or_else(|| "signal".into()),
            stderr.trim()
        ),
    ))
}

/// Page number of a `page-N.png` file written by pdftoppm (N may be zero-padded).
fn page_number(path: &Path) -> Option<u32> {
    if path.extension()?.to_str()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix("page-")?.parse().ok()
}
