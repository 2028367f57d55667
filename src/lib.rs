// src/lib.rs
//! encrypted-credentials: secret configuration encrypted at rest
//!
//! Features:
//! - AES-256-CBC + HMAC-SHA256 authenticated payloads (encrypt-then-MAC)
//! - show / encrypt / edit / validate / generate-key over YAML credentials
//! - Crash-safe key rotation with rollback and emergency key preservation
//! - Owner-only permissions on every file written

pub mod aliases;
pub mod config;
pub mod consts;
pub mod core;
pub mod document;
pub mod editor;
pub mod env;
pub mod error;
pub mod rotate_keys;
pub mod settings;
pub mod store;

// Re-export everything users need at the crate root
pub use crate::config::{load as load_config, Config, CredentialPaths};
pub use crate::core::{
    decrypt, decrypt_with, encrypt, encrypt_with, generate_key, is_valid_key, EncryptedPayload,
    FileSystem, Key, RealFileSystem,
};
pub use document::Document;
pub use editor::{EditorLauncher, SystemEditor};
pub use env::{Environment, MapEnvironment, ProcessEnvironment};
pub use error::{Recovery, Result, SecretsError, TransactionError};
pub use rotate_keys::{emergency_key_path, KeyRotation};
pub use settings::EncryptedSettings;
pub use store::SecretStore;
