//! Encrypted settings source
//!
//! Loads a credentials file as `section → name → value` lookups for
//! application config. Missing credentials, or no resolvable key, give an
//! empty source so per-environment secrets can be optional; a file that
//! exists but does not decrypt or parse is an error.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::core::file::FileSystem;
use crate::document::Document;
use crate::editor::EditorLauncher;
use crate::env::Environment;
use crate::error::{Result, SecretsError};
use crate::store::SecretStore;

#[derive(Debug, Clone)]
pub struct EncryptedSettings {
    credentials_path: PathBuf,
    key_path: PathBuf,
    document: Document,
}

impl EncryptedSettings {
    pub fn load<F, E, L>(
        store: &SecretStore<F, E, L>,
        credentials_path: &Path,
        key_path: &Path,
    ) -> Result<Self>
    where
        F: FileSystem,
        E: Environment,
        L: EditorLauncher,
    {
        let mut settings = Self {
            credentials_path: credentials_path.to_path_buf(),
            key_path: key_path.to_path_buf(),
            document: Document::Empty,
        };

        if !store.file_system().exists(credentials_path) {
            debug!(path = %credentials_path.display(), "no encrypted settings file");
            return Ok(settings);
        }

        let plaintext = match store.show(credentials_path, key_path) {
            Ok(plaintext) => plaintext,
            Err(SecretsError::NotFound(_)) => {
                debug!(path = %key_path.display(), "no key for encrypted settings");
                return Ok(settings);
            }
            Err(e) => return Err(e),
        };

        settings.document = Document::parse(&plaintext, &credentials_path.display().to_string())?;
        Ok(settings)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn get(&self, section: &str, name: &str) -> Option<&Value> {
        self.section(section)?.get(name)
    }

    /// A section that is itself a mapping; scalar sections have no settings
    pub fn section(&self, section: &str) -> Option<&Mapping> {
        self.document.as_mapping()?.get(section)?.as_mapping()
    }

    pub fn section_names(&self) -> Vec<String> {
        self.document
            .as_mapping()
            .map(|map| map.keys().filter_map(key_name).collect())
            .unwrap_or_default()
    }

    pub fn setting_names(&self, section: &str) -> Vec<String> {
        self.section(section)
            .map(|map| map.keys().filter_map(key_name).collect())
            .unwrap_or_default()
    }

    /// In-memory only until [`EncryptedSettings::save`]
    pub fn set(&mut self, section: &str, name: &str, value: impl Into<Value>) -> Result<&mut Self> {
        if matches!(self.document, Document::Empty) {
            self.document = Document::Mapping(Mapping::new());
        }
        let Document::Mapping(root) = &mut self.document else {
            return Err(SecretsError::Validation(
                "settings document is not a mapping; cannot add sections".to_owned(),
            ));
        };

        let key = Value::from(section);
        if !root.get(&key).is_some_and(Value::is_mapping) {
            root.insert(key.clone(), Value::Mapping(Mapping::new()));
        }
        if let Some(Value::Mapping(map)) = root.get_mut(&key) {
            map.insert(Value::from(name), value.into());
        }
        Ok(self)
    }

    /// Re-serialise and re-encrypt under the resolved key (owner-only file)
    pub fn save<F, E, L>(&self, store: &SecretStore<F, E, L>) -> Result<()>
    where
        F: FileSystem,
        E: Environment,
        L: EditorLauncher,
    {
        let key = store.resolve_key(&self.key_path)?;
        let yaml = zeroize::Zeroizing::new(self.document.to_yaml()?);
        let payload = crate::core::crypto::encrypt_with(yaml.as_bytes(), &key)?;
        store
            .file_system()
            .write_private(&self.credentials_path, &payload.to_bytes()?)?;
        debug!(path = %self.credentials_path.display(), "saved encrypted settings");
        Ok(())
    }
}

fn key_name(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
