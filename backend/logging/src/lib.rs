//! Logging components for the intake pipeline.
//!
//! Handles console and rotating event-log output, the append-only summary log,
//! and secret redaction.

pub mod logger;
pub mod redact;
pub mod summary_log;

pub use logger::init_logger;
pub use redact::redact_secrets;
pub use summary_log::SummaryLog;
