//! 256-bit symmetric key material
//!
//! A key is accepted either as 32 raw bytes or as 64 hex characters and is
//! always normalised to raw bytes before use. Storage, wiping and redaction
//! come from [`Key32`].

use zeroize::Zeroizing;

use crate::aliases::{Key32, SecureConversionsExt, SecureRandomExt};
use crate::consts::{KEY_HEX_LENGTH, KEY_LENGTH};
use crate::error::{Result, SecretsError};

#[derive(Debug)]
pub struct Key(Key32);

impl Key {
    pub fn new(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(Key32::new(bytes))
    }

    /// Fresh key from the OS-seeded RNG
    pub fn random() -> Self {
        Self(Key32::random())
    }

    /// Normalise a candidate (64 hex chars or 32 raw bytes) into a key.
    ///
    /// Surrounding ASCII whitespace is ignored for the hex form, so key files
    /// written by hand with a trailing newline still load.
    pub fn from_material(candidate: &[u8]) -> Result<Self> {
        let trimmed = candidate.trim_ascii();
        if trimmed.len() == KEY_HEX_LENGTH && trimmed.iter().all(u8::is_ascii_hexdigit) {
            let mut bytes = Zeroizing::new([0u8; KEY_LENGTH]);
            hex::decode_to_slice(trimmed, bytes.as_mut_slice())
                .map_err(|e| SecretsError::Validation(format!("invalid hex key: {e}")))?;
            return Ok(Self::new(*bytes));
        }

        if let Ok(bytes) = <[u8; KEY_LENGTH]>::try_from(candidate) {
            return Ok(Self::new(bytes));
        }

        Err(SecretsError::Validation(format!(
            "invalid key: must be {KEY_LENGTH} bytes (256 bits) or {KEY_HEX_LENGTH} hex characters"
        )))
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        Self::from_material(hex.as_bytes())
    }

    pub fn expose_secret(&self) -> &[u8; KEY_LENGTH] {
        self.0.expose_secret()
    }

    /// Lowercase hex form, as stored in key files
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(self.0.expose_secret().to_hex())
    }
}

impl Clone for Key {
    fn clone(&self) -> Self {
        Self::new(*self.expose_secret())
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.expose_secret() == other.expose_secret()
    }
}

impl Eq for Key {}

/// True iff `candidate` normalises to exactly 32 bytes
pub fn is_valid_key(candidate: &[u8]) -> bool {
    Key::from_material(candidate).is_ok()
}
