//! # Configuration Loading
//!
//! The effective [`SpaceConfig`] is built in three layers:
//!
//! 1. Built-in defaults.
//! 2. An optional TOML file (`--config <path>`), with a `[space]` table.
//! 3. The `ATOMWEAVE_LOCK_POOL_SIZE` environment variable.
//!
//! ```toml
//! [space]
//! lock_pool_size = 64
//! ```

use atomweave_core::{AtomError, SpaceConfig};
use serde::Deserialize;
use std::path::Path;

/// Environment variable overriding the lock pool size.
pub const LOCK_POOL_SIZE_ENV: &str = "ATOMWEAVE_LOCK_POOL_SIZE";

/// Maximum accepted config file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    space: SpaceConfig,
}

/// Effective configuration plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub space: SpaceConfig,
    pub source: String,
}

/// Parse the TOML text of a config file.
pub fn parse_config(text: &str) -> Result<SpaceConfig, AtomError> {
    let file: ConfigFile = toml::from_str(text)
        .map_err(|e| AtomError::Config(format!("invalid config file: {}", e)))?;
    Ok(file.space)
}

/// Read and parse a config file.
pub fn read_config_file(path: &Path) -> Result<SpaceConfig, AtomError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        AtomError::Config(format!("cannot read '{}': {}", path.display(), e))
    })?;
    if !metadata.is_file() {
        return Err(AtomError::Config(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(AtomError::Config(format!(
            "config file size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_CONFIG_FILE_SIZE
        )));
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| AtomError::Config(format!("cannot read '{}': {}", path.display(), e)))?;
    parse_config(&text)
}

/// Apply an environment override value, if any.
pub fn apply_env_override(
    mut config: SpaceConfig,
    value: Option<&str>,
) -> Result<SpaceConfig, AtomError> {
    if let Some(raw) = value {
        config.lock_pool_size = raw.trim().parse().map_err(|_| {
            AtomError::Config(format!(
                "{} must be a positive integer, got '{}'",
                LOCK_POOL_SIZE_ENV, raw
            ))
        })?;
    }
    Ok(config)
}

/// Build the effective configuration from defaults, file and environment.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, AtomError> {
    let (space, mut source) = match path {
        Some(p) => (read_config_file(p)?, p.display().to_string()),
        None => (SpaceConfig::default(), "defaults".to_string()),
    };

    let env_value = std::env::var(LOCK_POOL_SIZE_ENV).ok();
    let space = apply_env_override(space, env_value.as_deref())?;
    if env_value.is_some() {
        source.push_str(&format!(" + {}", LOCK_POOL_SIZE_ENV));
    }

    space.validate()?;
    tracing::debug!(lock_pool_size = space.lock_pool_size, %source, "configuration loaded");
    Ok(LoadedConfig { space, source })
}
