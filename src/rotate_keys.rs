// src/rotate_keys.rs
//! Crash-safe key rotation for a credentials file
//!
//! Whatever happens, afterwards exactly one of these holds:
//! - the old key still decrypts the credentials (nothing was committed, or the
//!   commit was rolled back from backup),
//! - the new key at its destination decrypts them (rotation committed),
//! - a `TransactionError` with `Recovery::EmergencyPreserved(path)` names a
//!   file holding the new key, which decrypts them.
//!
//! Atomic rename is the only commit primitive. The window between renaming the
//! credentials and renaming the key is bracketed by a backup taken before it
//! opens.
//!
//! Not safe for concurrent use on the same paths: callers hold their own lock.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

use crate::consts::{BACKUP_MARKER, EMERGENCY_KEY_SUFFIX, TEMP_FILE_PREFIX};
use crate::core::crypto::{decrypt_with, encrypt_with, generate_key};
use crate::core::file::{FileSystem, TempArtifact};
use crate::core::key::Key;
use crate::core::payload::EncryptedPayload;
use crate::core::util::{parent_dir, random_suffix, sibling_with_suffix};
use crate::error::{Recovery, Result, SecretsError, TransactionError};

/// Where a rotation that can neither commit nor roll back leaves the new key
pub fn emergency_key_path(key_path: &Path) -> PathBuf {
    sibling_with_suffix(key_path, EMERGENCY_KEY_SUFFIX)
}

pub struct KeyRotation<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> KeyRotation<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Replace the key protecting `credentials_path` with a fresh one stored at
    /// `new_key_path` (which may equal `old_key_path` for in-place rotation).
    ///
    /// Failures before the credentials are committed return the original
    /// error untouched. Failures after return `SecretsError::Transaction`.
    pub fn rotate(
        &self,
        credentials_path: &Path,
        old_key_path: &Path,
        new_key_path: &Path,
    ) -> Result<Key> {
        let fs = self.fs;

        // 1. Preflight
        if !fs.exists(credentials_path) {
            return Err(SecretsError::NotFound(format!(
                "credentials file not found: {}",
                credentials_path.display()
            )));
        }
        if !fs.exists(old_key_path) {
            return Err(SecretsError::NotFound(format!(
                "key file not found: {}",
                old_key_path.display()
            )));
        }
        let emergency = emergency_key_path(new_key_path);
        if fs.exists(&emergency) {
            return Err(SecretsError::Validation(format!(
                "an earlier rotation left an emergency key at {}; resolve it before rotating again",
                emergency.display()
            )));
        }
        let old_key = Key::from_material(&Zeroizing::new(fs.read(old_key_path)?))?;
        debug!(credentials = %credentials_path.display(), "rotation preflight passed");

        // 2. Decrypt-verify
        let payload = EncryptedPayload::from_json(&fs.read(credentials_path)?)?;
        let plaintext = decrypt_with(&payload, &old_key)?;
        debug!("existing credentials decrypt under the old key");

        // 3. Generate-new
        let new_key = generate_key();
        let key_tmp = TempArtifact::create(
            fs,
            &parent_dir(new_key_path),
            TEMP_FILE_PREFIX,
            ".key",
            new_key.to_hex().as_bytes(),
        )?;
        debug!(path = %key_tmp.path().display(), "new key staged");

        // 4. Re-encrypt
        let new_payload = encrypt_with(&plaintext, &new_key)?;
        let creds_tmp = TempArtifact::create(
            fs,
            &parent_dir(credentials_path),
            TEMP_FILE_PREFIX,
            ".enc",
            &new_payload.to_bytes()?,
        )?;
        debug!(path = %creds_tmp.path().display(), "re-encrypted credentials staged");

        // 5. Self-verify what actually reached the disk
        let staged_key = Key::from_material(&Zeroizing::new(fs.read(key_tmp.path())?))?;
        let staged = EncryptedPayload::from_json(&fs.read(creds_tmp.path())?)?;
        let roundtrip = decrypt_with(&staged, &staged_key)?;
        if staged_key != new_key || roundtrip.as_slice() != plaintext.as_slice() {
            return Err(SecretsError::Validation(
                "re-encrypted credentials failed verification; nothing was changed".to_owned(),
            ));
        }
        debug!("staged credentials verified under the new key");

        // 6. Backup credentials (copy, never move)
        let creds_backup = self.backup(credentials_path)?;

        // 7. Backup whatever already sits at the key destination (always for in-place)
        let key_backup = if fs.exists(new_key_path) {
            Some(self.backup(new_key_path)?)
        } else {
            None
        };

        // 8. Commit credentials (first irreversible step)
        if let Err(e) = fs.rename(creds_tmp.path(), credentials_path) {
            warn!(error = %e, "credentials commit failed; nothing was changed");
            return Err(TransactionError::new(Recovery::RolledBack, e.into()).into());
        }
        creds_tmp.keep();
        debug!("credentials committed under the new key");

        // 9. Commit key
        let commit_err = match fs.rename(key_tmp.path(), new_key_path) {
            Ok(()) => {
                key_tmp.keep();
                // Dropping the guards removes both backups
                drop(key_backup);
                drop(creds_backup);
                info!(
                    credentials = %credentials_path.display(),
                    key = %new_key_path.display(),
                    "key rotation committed"
                );
                return Ok(new_key);
            }
            Err(e) => e,
        };
        warn!(error = %commit_err, "key commit failed; restoring credentials from backup");

        match fs.rename(creds_backup.path(), credentials_path) {
            Ok(()) => {
                creds_backup.keep();
                // The new key is discarded (key_tmp drops) only now that nothing depends on it
                warn!(
                    credentials = %credentials_path.display(),
                    "key rotation rolled back; old key still valid"
                );
                Err(TransactionError::new(Recovery::RolledBack, commit_err.into()).into())
            }
            Err(undo_err) => {
                error!(
                    error = %undo_err,
                    credentials = %credentials_path.display(),
                    "CRITICAL: rollback failed; credentials are encrypted under the new key"
                );
                // Both backups stay on disk: together with the old key they still
                // hold a readable pre-rotation copy.
                let backup_path = creds_backup.keep();
                if let Some(kb) = key_backup {
                    kb.keep();
                }
                Err(self
                    .preserve(&emergency, new_key, key_tmp, &backup_path, commit_err)
                    .into())
            }
        }
    }

    fn backup(&self, path: &Path) -> Result<TempArtifact<'a>> {
        let backup_path =
            sibling_with_suffix(path, &format!("{BACKUP_MARKER}{}", random_suffix()));
        let guard = TempArtifact::adopt(self.fs, backup_path);
        self.fs.copy(path, guard.path())?;
        debug!(from = %path.display(), to = %guard.path().display(), "backup taken");
        Ok(guard)
    }

    /// Last resort: write the new key next to its destination before anything
    /// else is cleaned up.
    fn preserve(
        &self,
        emergency: &Path,
        new_key: Key,
        key_tmp: TempArtifact<'a>,
        credentials_backup: &Path,
        cause: std::io::Error,
    ) -> TransactionError {
        match self.fs.write_private(emergency, new_key.to_hex().as_bytes()) {
            Ok(()) => {
                error!(
                    emergency_key = %emergency.display(),
                    credentials_backup = %credentials_backup.display(),
                    "CRITICAL: new key preserved at emergency path; move it onto the key path"
                );
                drop(key_tmp);
                TransactionError::new(
                    Recovery::EmergencyPreserved(emergency.to_path_buf()),
                    cause.into(),
                )
            }
            Err(write_err) => {
                // Leave the staged key file too: it may be the only copy on disk
                let staged = key_tmp.keep();
                error!(
                    error = %write_err,
                    staged_key = %staged.display(),
                    credentials_backup = %credentials_backup.display(),
                    "CRITICAL: could not preserve new key; only in memory and the staged file"
                );
                TransactionError::unrecoverable(cause.into(), new_key)
            }
        }
    }
}
