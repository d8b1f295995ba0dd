//! Log Redaction
//!
//! Scrubs Slack tokens, bearer tokens, and API keys from strings prior to
//! logging. Collaborator error bodies pass through here.

use regex::Regex;
use std::sync::LazyLock;

static SLACK_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"xox[abprs]-[A-Za-z0-9\-]+").unwrap());
static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[A-Za-z0-9_\-]{16,})|(Bearer\s+[A-Za-z0-9\-\._~+/]+=*)").unwrap()
});

/// Redacts secret-looking substrings.
pub fn redact_secrets(input: &str) -> String {
    let redacted = SLACK_TOKEN_RE.replace_all(input, "[REDACTED_TOKEN]");
    API_KEY_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}
