//! Config file discovery and loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

use crate::env::substitute_env_refs;
use crate::schema::AblageConfig;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "ablage.yaml";

/// Resolve the config file path.
/// Priority: explicit path > `ABLAGE_CONFIG` env > `./ablage.yaml`
pub fn config_file_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("ABLAGE_CONFIG") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk, resolving `${VAR}` references.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub async fn load_config(path: &Path) -> Result<AblageConfig> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(AblageConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&raw).with_context(|| format!("Invalid config at: {}", path.display()))
}

/// Parse config text; blank text means defaults.
pub fn parse_config(raw: &str) -> Result<AblageConfig> {
    if raw.trim().is_empty() {
        return Ok(AblageConfig::default());
    }
    let resolved = substitute_env_refs(raw)?;
    let config: AblageConfig =
        serde_yaml::from_str(&resolved).context("Failed to parse config YAML")?;
    Ok(config)
}
