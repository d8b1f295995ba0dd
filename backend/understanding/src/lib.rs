//! Text understanding for scanned documents: OCR, classification, task and
//! deadline extraction, summaries, and PDF metadata.

pub mod classify;
pub mod doc_parse;
pub mod ocr;
pub mod summary;
pub mod tasks;

pub use classify::{classify, classify_with, Rule, DEFAULT_LABEL, RULES};
pub use doc_parse::{decode_text_string, read_author, PdfMetadataReader};
pub use ocr::TesseractOcr;
pub use summary::{sentences, summarize, DEFAULT_MAX_SENTENCES};
pub use tasks::{extract_tasks, DATE_PATTERN};
