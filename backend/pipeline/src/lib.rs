//! Archival and the per-document intake pipeline.

pub mod archive;
pub mod orchestrator;

pub use archive::{archive_file_name, author_dir, sanitize, Archiver, MAX_FILE_NAME_LEN};
pub use orchestrator::{Pipeline, ProcessOptions};
