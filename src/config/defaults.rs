// src/config/defaults.rs
use crate::config::app::{EditorConfig, Keys, Paths};
use crate::consts::{DEFAULT_ENV_PREFIX, DEFAULT_MASTER_KEY_FALLBACK_VAR, MASTER_KEY_FILE_NAME};

pub const DEFAULT_CONFIG_FILE: &str = "credentials.toml";
pub const DEFAULT_CONFIG_DIR: &str = "config";
pub const DEFAULT_CREDENTIALS_FILE: &str = "secrets.yml.enc";
pub const DEFAULT_ENVIRONMENTS_DIR: &str = "secrets";

pub fn default_paths() -> Paths {
    Paths {
        config_dir: DEFAULT_CONFIG_DIR.into(),
        credentials_file: DEFAULT_CREDENTIALS_FILE.into(),
        key_file: MASTER_KEY_FILE_NAME.into(),
        environments_dir: DEFAULT_ENVIRONMENTS_DIR.into(),
    }
}

pub fn default_keys() -> Keys {
    Keys {
        env_prefix: DEFAULT_ENV_PREFIX.into(),
        master_key_fallback_var: Some(DEFAULT_MASTER_KEY_FALLBACK_VAR.into()),
    }
}

pub fn default_editor() -> EditorConfig {
    EditorConfig { command: None }
}
