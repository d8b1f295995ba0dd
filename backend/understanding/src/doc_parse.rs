//! PDF metadata reader.
//!
//! Pulls `/Author` out of the trailer's `/Info` dictionary with `lopdf`.
//! Every failure degrades to [`UNKNOWN_AUTHOR`].

use std::path::{Path, PathBuf};

use ablage_core::{MetadataReader, UNKNOWN_AUTHOR};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use lopdf::{Document, Object};
use tracing::debug;

pub struct PdfMetadataReader;

#[async_trait]
impl MetadataReader for PdfMetadataReader {
    async fn author_of(&self, pdf: &Path) -> String {
        let path: PathBuf = pdf.to_path_buf();
        let result = tokio::task::spawn_blocking(move || read_author(&path)).await;
        match result {
            Ok(Ok(Some(author))) => author,
            Ok(Ok(None)) => {
                debug!(path = %pdf.display(), "No author in PDF metadata");
                UNKNOWN_AUTHOR.to_string()
            }
            Ok(Err(e)) => {
                debug!(path = %pdf.display(), error = %e, "Could not read PDF metadata");
                UNKNOWN_AUTHOR.to_string()
            }
            Err(e) => {
                debug!(path = %pdf.display(), error = %e, "Metadata task failed");
                UNKNOWN_AUTHOR.to_string()
            }
        }
    }
}

/// Read the author; `Ok(None)` when the document has none.
pub fn read_author(path: &Path) -> Result<Option<String>> {
    let doc = Document::load(path)
        .with_context(|| format!("Failed to parse PDF: {}", path.display()))?;

    let Ok(info) = doc.trailer.get(b"Info") else {
        return Ok(None);
    };
    let info = match info {
        Object::Reference(id) => doc.get_object(*id).context("Dangling /Info reference")?,
        other => other,
    };
    let Object::Dictionary(dict) = info else {
        return Err(anyhow!("/Info is not a dictionary"));
    };
    let Ok(author) = dict.get(b"Author") else {
        return Ok(None);
    };
    let author = match author {
        Object::Reference(id) => doc.get_object(*id).context("Dangling /Author reference")?,
        other => other,
    };
    let Object::String(bytes, _) = author else {
        return Err(anyhow!("/Author is not a string"));
    };

    let text = decode_text_string(bytes);
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    Ok((!text.is_empty()).then(|| text.to_string()))
}

/// Decode a PDF text string: UTF-16BE with BOM, else UTF-8, else Latin-1.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
