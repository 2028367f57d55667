//! Environment-variable lookup collaborator
//!
//! Injected into the store instead of reading process state directly, so the
//! key fallback can be exercised without mutating the test process env.

use std::collections::HashMap;
use std::path::Path;

use crate::consts::{KEY_ENV_SUFFIX, KEY_FILE_EXTENSION};

pub trait Environment {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed set of variables, handy for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment(HashMap<String, String>);

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }
}

impl Environment for MapEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Environment variable consulted when no key file exists at `key_path`.
///
/// `config/secrets/production.key` with prefix `SECRETS` → `SECRETS_PRODUCTION_KEY`.
pub fn key_env_var(prefix: &str, key_path: &Path) -> String {
    let name = key_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(KEY_FILE_EXTENSION).unwrap_or(&name);

    let stem: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();

    format!("{prefix}_{stem}{KEY_ENV_SUFFIX}")
}
