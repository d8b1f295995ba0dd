//! Notification channels for intake results.

pub mod slack;

pub use slack::SlackNotifier;

use ablage_core::{DocumentType, Task};

/// Message text posted after a document has been archived.
pub fn intake_message(document_type: DocumentType, tasks: &[Task]) -> String {
    let tasks_json = serde_json::to_string_pretty(tasks).unwrap_or_else(|_| "[]".to_string());
    format!("Dokumenttyp: {document_type}\nAufgaben: {tasks_json}")
}
