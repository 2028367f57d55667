// src/config/app.rs
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::defaults::*;
use crate::consts::DEFAULT_EDITOR;
use crate::env::Environment;
use crate::error::{Result, SecretsError};

/// Names the config file to load instead of `credentials.toml`
pub const CONFIG_ENV_VAR: &str = "CREDENTIALS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    pub editor: EditorConfig,
    pub keys: Keys,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Paths {
    pub config_dir: PathBuf,
    pub credentials_file: String,
    pub key_file: String,
    pub environments_dir: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorConfig {
    pub command: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Keys {
    /// `<PREFIX>` of derived key variables (`<PREFIX>_<STEM>_KEY`)
    pub env_prefix: String,
    /// Extra variable consulted for a key file named `master.key`
    pub master_key_fallback_var: Option<String>,
}

impl Default for Paths {
    fn default() -> Self {
        default_paths()
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        default_editor()
    }
}

impl Default for Keys {
    fn default() -> Self {
        default_keys()
    }
}

impl Config {
    /// Editor to launch: explicit choice, then config, then `$EDITOR`, then `vi`
    pub fn editor_command(&self, explicit: Option<&str>, env: &dyn Environment) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.editor.command.clone())
            .or_else(|| env.var("EDITOR").filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_EDITOR.to_owned())
    }
}

/// Load config from `$CREDENTIALS_CONFIG` or `credentials.toml`; falls back to defaults if missing
pub fn load(env: &dyn Environment) -> Result<Config> {
    let config_path = env
        .var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if !config_path.exists() {
        warn!(
            path = %config_path.display(),
            "config file not found, using built-in defaults"
        );
        return Ok(Config::default());
    }

    load_from(&config_path)
}

pub fn load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SecretsError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    let config: Config = toml::from_str(&content)
        .map_err(|e| SecretsError::Config(format!("invalid TOML in {}: {e}", path.display())))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}
