//! SecretStore: show / encrypt / edit / validate / generate-key
//!
//! Orchestrates the cipher with the file-system, environment and editor
//! collaborators. Nothing here touches process-global state.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::config::Keys;
use crate::consts::{MASTER_KEY_FILE_NAME, TEMP_FILE_PREFIX};
use crate::core::crypto::{decrypt_with, encrypt_with, generate_key};
use crate::core::file::{FileSystem, RealFileSystem, TempArtifact};
use crate::core::key::Key;
use crate::core::payload::EncryptedPayload;
use crate::document::Document;
use crate::editor::{EditorLauncher, SystemEditor};
use crate::env::{key_env_var, Environment, ProcessEnvironment};
use crate::error::{Result, SecretsError};
use crate::rotate_keys::KeyRotation;

pub struct SecretStore<F = RealFileSystem, E = ProcessEnvironment, L = SystemEditor> {
    fs: F,
    env: E,
    editor: L,
    keys: Keys,
    temp_dir: PathBuf,
}

impl Default for SecretStore {
    fn default() -> Self {
        Self::new(RealFileSystem, ProcessEnvironment, SystemEditor)
    }
}

impl<F: FileSystem, E: Environment, L: EditorLauncher> SecretStore<F, E, L> {
    pub fn new(fs: F, env: E, editor: L) -> Self {
        Self {
            fs,
            env,
            editor,
            keys: Keys::default(),
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Key-variable naming from config (`[keys]`)
    pub fn with_keys(mut self, keys: Keys) -> Self {
        self.keys = keys;
        self
    }

    /// Directory for the plaintext scratch file used by [`SecretStore::edit`]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    pub fn editor(&self) -> &L {
        &self.editor
    }

    /// Generate a key and store it as hex at `key_path` (owner-only)
    pub fn generate_key(&self, key_path: &Path, force: bool) -> Result<Key> {
        if self.fs.exists(key_path) && !force {
            return Err(SecretsError::AlreadyExists(key_path.to_path_buf()));
        }

        let key = generate_key();
        self.fs.write_private(key_path, key.to_hex().as_bytes())?;
        info!(path = %key_path.display(), "generated encryption key");
        Ok(key)
    }

    /// Encrypt a plaintext YAML file into `credentials_path`
    pub fn encrypt(
        &self,
        plaintext_path: &Path,
        credentials_path: &Path,
        key_path: &Path,
    ) -> Result<()> {
        if !self.fs.exists(plaintext_path) {
            return Err(SecretsError::NotFound(format!(
                "plaintext file not found: {}",
                plaintext_path.display()
            )));
        }

        let content = Zeroizing::new(self.fs.read(plaintext_path)?);
        // Never persist invalid-but-encrypted garbage
        Document::parse(&content, &plaintext_path.display().to_string())?;

        let key = self.ensure_key(key_path)?;
        self.write_payload(credentials_path, &content, &key)?;
        info!(
            from = %plaintext_path.display(),
            to = %credentials_path.display(),
            "encrypted credentials"
        );
        Ok(())
    }

    /// Decrypt and return the credentials plaintext
    pub fn show(&self, credentials_path: &Path, key_path: &Path) -> Result<Zeroizing<Vec<u8>>> {
        if !self.fs.exists(credentials_path) {
            return Err(SecretsError::NotFound(format!(
                "credentials file not found: {}",
                credentials_path.display()
            )));
        }

        let key = self.resolve_key(key_path)?;
        self.read_plaintext(credentials_path, &key)
    }

    /// Decrypt into a scratch file, run the editor on it, re-encrypt the result.
    ///
    /// The scratch file is removed on every exit path.
    pub fn edit(
        &self,
        credentials_path: &Path,
        key_path: &Path,
        editor_command: &str,
    ) -> Result<()> {
        let key = self.ensure_key(key_path)?;

        let content = if self.fs.exists(credentials_path) {
            self.read_plaintext(credentials_path, &key)?
        } else {
            Zeroizing::new(Vec::new())
        };

        let scratch = TempArtifact::create(
            &self.fs,
            &self.temp_dir,
            TEMP_FILE_PREFIX,
            ".yml",
            &content,
        )?;
        debug!(path = %scratch.path().display(), editor = editor_command, "launching editor");

        let code = self
            .editor
            .launch(editor_command, scratch.path())
            .map_err(|e| {
                SecretsError::Editor(format!("failed to launch {editor_command:?}: {e}"))
            })?;
        if code != 0 {
            return Err(SecretsError::Editor(format!("editor exited with code {code}")));
        }

        let edited = Zeroizing::new(self.fs.read(scratch.path())?);
        Document::parse(&edited, "edited credentials")?;

        self.write_payload(credentials_path, &edited, &key)?;
        info!(path = %credentials_path.display(), "saved edited credentials");
        Ok(())
    }

    /// Health check: can the credentials be decrypted? All error detail is discarded.
    pub fn validate(&self, credentials_path: &Path, key_path: &Path) -> bool {
        match self.show(credentials_path, key_path) {
            Ok(_) => true,
            Err(e) => {
                debug!(
                    path = %credentials_path.display(),
                    error = %e,
                    "credentials failed validation"
                );
                false
            }
        }
    }

    /// Re-encrypt `credentials_path` under a fresh key stored at `new_key_path`.
    ///
    /// Callers must serialise rotations of the same files themselves.
    pub fn rotate_key(
        &self,
        credentials_path: &Path,
        old_key_path: &Path,
        new_key_path: &Path,
    ) -> Result<Key> {
        KeyRotation::new(&self.fs).rotate(credentials_path, old_key_path, new_key_path)
    }

    /// Key file first, then the environment fallback; `NotFound` if neither exists
    pub fn resolve_key(&self, key_path: &Path) -> Result<Key> {
        if self.fs.exists(key_path) {
            let material = Zeroizing::new(self.fs.read(key_path)?);
            return Key::from_material(&material);
        }

        for name in self.fallback_vars(key_path) {
            if let Some(value) = self.env.var(&name) {
                debug!(var = %name, "using key from environment");
                return Key::from_material(Zeroizing::new(value).as_bytes());
            }
        }

        Err(SecretsError::NotFound(format!(
            "key file not found: {} (and {} is not set)",
            key_path.display(),
            self.fallback_vars(key_path).join(" / ")
        )))
    }

    /// [`SecretStore::resolve_key`], generating and persisting a key when none exists
    pub fn ensure_key(&self, key_path: &Path) -> Result<Key> {
        match self.resolve_key(key_path) {
            Err(SecretsError::NotFound(_)) => {
                warn!(path = %key_path.display(), "no key found, generating a new one");
                self.generate_key(key_path, false)
            }
            other => other,
        }
    }

    /// Environment variables consulted for `key_path`, in order
    pub fn fallback_vars(&self, key_path: &Path) -> Vec<String> {
        let mut vars = vec![key_env_var(&self.keys.env_prefix, key_path)];
        let is_master = key_path
            .file_name()
            .is_some_and(|name| name == MASTER_KEY_FILE_NAME);
        if is_master {
            if let Some(var) = &self.keys.master_key_fallback_var {
                vars.push(var.clone());
            }
        }
        vars
    }

    fn read_plaintext(&self, credentials_path: &Path, key: &Key) -> Result<Zeroizing<Vec<u8>>> {
        let payload = EncryptedPayload::from_json(&self.fs.read(credentials_path)?)?;
        decrypt_with(&payload, key)
    }

    fn write_payload(&self, credentials_path: &Path, plaintext: &[u8], key: &Key) -> Result<()> {
        let payload = encrypt_with(plaintext, key)?;
        self.fs.write_private(credentials_path, &payload.to_bytes()?)?;
        Ok(())
    }
}
