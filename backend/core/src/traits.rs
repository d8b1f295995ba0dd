use std::path::Path;

use async_trait::async_trait;

use crate::error::IntakeError;

/// OCR collaborator: maps a PDF path to its extracted page text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Engine name for logging (e.g., "tesseract").
    fn name(&self) -> &str;

    async fn extract_text(&self, pdf: &Path) -> Result<String, IntakeError>;
}

/// Reads the author from embedded document metadata.
///
/// Never fails: implementations return [`crate::UNKNOWN_AUTHOR`] on any problem.
#[async_trait]
pub trait MetadataReader: Send + Sync {
    async fn author_of(&self, pdf: &Path) -> String;
}

/// Fire-and-forget message channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, text: &str) -> Result<(), IntakeError>;
}

/// Speech synthesis plus playback.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn narrate(&self, text: &str) -> Result<(), IntakeError>;
}
