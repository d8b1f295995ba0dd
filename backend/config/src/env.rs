//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside the YAML text, resolved before parsing.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names are matched; `$${VAR}` escapes to
//!   a literal `${VAR}`.
//! - Well-known variables (`SLACK_TOKEN`, `ABLAGE_INTERVAL`, ...) that override
//!   parsed values.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::schema::{AblageConfig, TtsProviderChoice};

/// Matches `$${VAR}` (escaped) and `${VAR}` in one pass.
static ENV_REF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for references to unset env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced on config line {line}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub line: usize,
}

/// Substitute `${VAR}` references in raw config text from the process env.
pub fn substitute_env_refs(text: &str) -> Result<String> {
    substitute_env_refs_with(text, &std::env::vars().collect())
}

/// Substitute env refs using a provided map (useful for testing).
pub fn substitute_env_refs_with(text: &str, env: &HashMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let mut missing: Option<String> = None;
        let replaced = ENV_REF_PATTERN.replace_all(line, |caps: &Captures| {
            let name = &caps[2];
            if !caps[1].is_empty() {
                return format!("${{{name}}}");
            }
            match env.get(name) {
                Some(val) if !val.is_empty() => val.clone(),
                _ => {
                    missing.get_or_insert_with(|| name.to_string());
                    String::new()
                }
            }
        });
        if let Some(var_name) = missing {
            bail!(MissingEnvVarError {
                var_name,
                line: idx + 1,
            });
        }
        out.push_str(&replaced);
    }
    Ok(out)
}

/// Apply well-known environment overrides from the process env.
pub fn apply_env_overrides(config: AblageConfig) -> AblageConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply well-known environment overrides from a provided map.
///
/// Empty values are ignored; unparsable numbers keep the configured value.
pub fn apply_env_overrides_with(
    mut config: AblageConfig,
    env: &HashMap<String, String>,
) -> AblageConfig {
    let get = |key: &str| env.get(key).filter(|v| !v.trim().is_empty()).cloned();

    if let Some(path) = get("ABLAGE_HOTFOLDER") {
        config.hotfolder.path = PathBuf::from(path);
    }
    if let Some(secs) = get("ABLAGE_INTERVAL").and_then(|v| v.trim().parse().ok()) {
        config.hotfolder.interval_secs = secs;
    }
    if let Some(root) = get("ABLAGE_ARCHIVE_ROOT") {
        config.archive.root = PathBuf::from(root);
    }
    if let Some(dir) = get("ABLAGE_LOG_DIR") {
        config.logging.dir = PathBuf::from(dir);
    }
    if let Some(level) = get("ABLAGE_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Some(token) = get("SLACK_TOKEN").or_else(|| get("SLACK_BOT_TOKEN")) {
        config.slack.token = Some(token);
    }
    if let Some(channel) = get("SLACK_CHANNEL") {
        config.slack.channel = Some(channel);
    }

    if config.narration.api_key.is_none() {
        config.narration.api_key = match config.narration.provider {
            TtsProviderChoice::OpenAi => get("OPENAI_API_KEY"),
            TtsProviderChoice::ElevenLabs => get("ELEVENLABS_API_KEY"),
        };
    }

    config
}
