// src/config/paths.rs
use std::path::PathBuf;

use crate::config::app::Config;
use crate::consts::KEY_FILE_EXTENSION;
use crate::error::{Result, SecretsError};

/// Where one set of credentials and its key live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPaths {
    pub credentials: PathBuf,
    pub key: PathBuf,
}

impl CredentialPaths {
    /// Base secrets (`config/secrets.yml.enc` + `config/master.key`) or, for a
    /// named environment, `config/secrets/<env>.yml.enc` + `config/secrets/<env>.key`
    pub fn resolve(config: &Config, environment: Option<&str>) -> Result<Self> {
        let root = &config.paths.config_dir;
        match environment {
            None => Ok(Self {
                credentials: root.join(&config.paths.credentials_file),
                key: root.join(&config.paths.key_file),
            }),
            Some(env) => {
                if env.is_empty()
                    || !env
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
                {
                    return Err(SecretsError::Validation(format!(
                        "invalid environment name: {env:?}"
                    )));
                }
                let dir = root.join(&config.paths.environments_dir);
                Ok(Self {
                    credentials: dir.join(format!("{env}.yml.enc")),
                    key: dir.join(format!("{env}{KEY_FILE_EXTENSION}")),
                })
            }
        }
    }
}
