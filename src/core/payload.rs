//! Self-describing authenticated payload, the on-disk credentials format
//!
//! ```json
//! {"cipher":"aes-256-cbc","encrypted":"<base64>","iv":"<base64>","mac":"<hex>"}
//! ```
//!
//! Binary fields stay in their transport (base64/hex) form inside this type:
//! the MAC is defined over those strings, so they are authenticated exactly as
//! stored and decoded only after the tag has been verified.

use serde::{Deserialize, Serialize};

use crate::consts::MAC_FIELD_SEPARATOR;
use crate::error::{Result, SecretsError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    cipher: String,
    encrypted: String,
    iv: String,
    mac: String,
}

impl EncryptedPayload {
    pub(crate) fn new(cipher: String, encrypted: String, iv: String, mac: String) -> Self {
        Self {
            cipher,
            encrypted,
            iv,
            mac,
        }
    }

    pub fn cipher(&self) -> &str {
        &self.cipher
    }

    /// Base64 ciphertext
    pub fn encrypted(&self) -> &str {
        &self.encrypted
    }

    /// Base64 initialisation vector
    pub fn iv(&self) -> &str {
        &self.iv
    }

    /// Hex HMAC-SHA256 tag
    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// Canonical, order-fixed MAC input: `cipher.encrypted.iv`
    pub(crate) fn mac_input(cipher: &str, encrypted: &str, iv: &str) -> String {
        [cipher, encrypted, iv].join(MAC_FIELD_SEPARATOR)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| SecretsError::Validation(format!("cannot serialise payload: {e}")))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_json().map(String::into_bytes)
    }

    /// Structural parse only; nothing here is trusted until `decrypt` verifies the tag
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(|e| {
            SecretsError::Validation(format!(
                "invalid encrypted data, expected JSON with cipher/encrypted/iv/mac: {e}"
            ))
        })
    }
}
