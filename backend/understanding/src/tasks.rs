//! Task extractor: finds "<task> bis <D.M.YYYY>" spans.

use ablage_core::Task;
use once_cell::sync::Lazy;
use regex::Regex;

/// A German date token, e.g. `31.12.2024` or `1.2.2025`.
pub const DATE_PATTERN: &str = r"[0-9]{1,2}\.[0-9]{1,2}\.[0-9]{4}";

/// Lazy task span that may not cross a sentence terminator, then the
/// connective `bis` and a date.
static TASK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(?P<task>[^.!?]*?)\s+bis\s+(?P<date>{DATE_PATTERN})"
    ))
    .unwrap()
});

/// Extract all non-overlapping tasks, left to right, without deduplication.
pub fn extract_tasks(text: &str) -> Vec<Task> {
    TASK_RE
        .captures_iter(text)
        .map(|caps| Task {
            task: caps["task"].trim().to_string(),
            due: caps["date"].to_string(),
        })
        .collect()
}
