use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Author used when PDF metadata is absent or unreadable.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Document-type label assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "Rechnung")]
    Invoice,
    #[serde(rename = "Bescheid")]
    Notice,
    #[serde(rename = "Kündigung")]
    Termination,
    #[serde(rename = "Sonstiges")]
    Miscellaneous,
}

impl DocumentType {
    /// The label as written to the summary record and the archive filename.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Invoice => "Rechnung",
            Self::Notice => "Bescheid",
            Self::Termination => "Kündigung",
            Self::Miscellaneous => "Sonstiges",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A task with its deadline, found as "<task> bis <D.M.YYYY>".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task: String,
    pub due: String,
}

/// One persisted line of the summary log.
///
/// Field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub pdf: String,
    pub archived: String,
    pub document_type: DocumentType,
    pub tasks: Vec<Task>,
    pub author: String,
    pub summary: String,
}

/// A document as it moves through one pipeline run.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: PathBuf,
    pub text: String,
    pub document_type: DocumentType,
    pub author: String,
    pub tasks: Vec<Task>,
    pub summary: String,
    pub archived: PathBuf,
}

impl Document {
    pub fn summary_record(&self) -> SummaryRecord {
        SummaryRecord {
            pdf: self.source.display().to_string(),
            archived: self.archived.display().to_string(),
            document_type: self.document_type,
            tasks: self.tasks.clone(),
            author: self.author.clone(),
            summary: self.summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_serialize_as_german_strings() {
        let json = serde_json::to_string(&DocumentType::Termination).unwrap();
        assert_eq!(json, "\"Kündigung\"");
        assert_eq!(DocumentType::Invoice.to_string(), "Rechnung");
    }

    #[test]
    fn summary_record_keeps_field_order() {
        let doc = Document {
            source: PathBuf::from("hotfolder/scan.pdf"),
            text: "Rechnung".into(),
            document_type: DocumentType::Invoice,
            author: UNKNOWN_AUTHOR.into(),
            tasks: vec![Task {
                task: "Zahlung leisten".into(),
                due: "31.12.2024".into(),
            }],
            summary: "Rechnung".into(),
            archived: PathBuf::from("archive/Unknown/Rechnung_2024_01_01_120000_scan."),
        };
        let line = serde_json::to_string(&doc.summary_record()).unwrap();
        let keys = ["\"pdf\"", "\"archived\"", "\"document_type\"", "\"tasks\"", "\"author\"", "\"summary\""];
        let positions: Vec<usize> = keys.iter().map(|k| line.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{line}");
    }
}
