// src/error.rs
//! Public error type for the entire crate

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::key::Key;

pub type Result<T> = std::result::Result<T, SecretsError>;

#[derive(Error, Debug)]
pub enum SecretsError {
    /// Bad key length/format, malformed payload, unrecognised cipher id
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Tag mismatch: tampered payload or wrong key
    #[error("Authentication failed: payload was tampered with or the key is wrong")]
    Authentication,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Key file already exists: {}. Use force to overwrite.", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Invalid YAML in {origin}: {message}")]
    InvalidDocument { origin: String, message: String },

    #[error("Editor failed: {0}")]
    Editor(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

impl SecretsError {
    /// True when the operation left everything as it was and can simply be run again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SecretsError::Transaction(TransactionError {
                recovery: Recovery::RolledBack,
                ..
            })
        )
    }

    pub fn recovery(&self) -> Option<&Recovery> {
        match self {
            SecretsError::Transaction(tx) => Some(&tx.recovery),
            _ => None,
        }
    }
}

/// Which recovery branch a failed key rotation ended in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// Credentials restored from backup; the old key still decrypts them
    RolledBack,
    /// Credentials now depend on a key that only exists at this path
    EmergencyPreserved(PathBuf),
    /// Credentials depend on a key that could not be written anywhere
    Unrecoverable,
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recovery::RolledBack => write!(
                f,
                "rolled back: credentials are unchanged and still use the old key; safe to retry"
            ),
            Recovery::EmergencyPreserved(path) => write!(
                f,
                "CRITICAL: credentials are encrypted with a new key saved ONLY at {}; \
                 move it onto the key path before doing anything else",
                path.display()
            ),
            Recovery::Unrecoverable => write!(
                f,
                "CRITICAL: credentials are encrypted with a new key that could not be persisted; \
                 the key is held only by this error value"
            ),
        }
    }
}

/// Rotation failure after the real credentials file was touched
#[derive(Error)]
#[error("Key rotation failed ({recovery}): {cause}")]
pub struct TransactionError {
    pub recovery: Recovery,
    #[source]
    pub cause: Box<SecretsError>,
    unrecovered_key: Option<Key>,
}

impl TransactionError {
    pub fn new(recovery: Recovery, cause: SecretsError) -> Self {
        Self {
            recovery,
            cause: Box::new(cause),
            unrecovered_key: None,
        }
    }

    pub(crate) fn unrecoverable(cause: SecretsError, key: Key) -> Self {
        Self {
            recovery: Recovery::Unrecoverable,
            cause: Box::new(cause),
            unrecovered_key: Some(key),
        }
    }

    /// The only remaining copy of the new key when recovery is `Unrecoverable`
    pub fn unrecovered_key(&self) -> Option<&Key> {
        self.unrecovered_key.as_ref()
    }
}

impl fmt::Debug for TransactionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionError")
            .field("recovery", &self.recovery)
            .field("cause", &self.cause)
            .field("holds_key", &self.unrecovered_key.is_some())
            .finish()
    }
}
