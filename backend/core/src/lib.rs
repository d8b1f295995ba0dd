pub mod capability;
pub mod error;
pub mod traits;
pub mod types;

pub use capability::Collaborator;
pub use error::IntakeError;
pub use traits::{MetadataReader, Narrator, Notifier, TextExtractor};
pub use types::{Document, DocumentType, SummaryRecord, Task, UNKNOWN_AUTHOR};
