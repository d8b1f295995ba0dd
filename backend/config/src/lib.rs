//! `ablage-config`: runtime configuration for the intake pipeline.
//!
//! Provides:
//! - Typed config schema with serde defaults for every section
//! - YAML loading with `${ENV_VAR}` substitution
//! - `.env` loading and well-known environment overrides
//! - Validation and redaction for safe logging

pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{
    apply_env_overrides, apply_env_overrides_with, substitute_env_refs,
    substitute_env_refs_with, MissingEnvVarError,
};
pub use io::{config_file_path, load_config, parse_config, CONFIG_FILE_NAME};
pub use redact::redacted;
pub use schema::{
    AblageConfig, ArchiveConfig, CollisionPolicy, HotfolderConfig, KeptFilePolicy,
    LoggingConfig, NarrationConfig, OcrConfig, SlackConfig, TtsProviderChoice,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::Result;
use std::path::Path;

/// Load `.env`, read the config file, apply env overrides, and validate.
///
/// This is the main entry point for loading a config at runtime. The report
/// is returned rather than logged because logging is configured from the
/// result.
pub async fn load_and_prepare(explicit: Option<&Path>) -> Result<(AblageConfig, ValidationReport)> {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    let path = config_file_path(explicit);
    let config = load_config(&path).await?;
    let config = apply_env_overrides(config);
    let report = validate(&config);
    Ok((config, report))
}
