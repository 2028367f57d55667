//! Pure cryptographic primitives, no I/O
//!
//! AES-256-CBC with PKCS#7 padding, then HMAC-SHA256 over the transport form
//! of `{cipher id, ciphertext, IV}` (encrypt-then-MAC). Decryption verifies
//! the tag in constant time before the ciphertext is even base64-decoded.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::consts::{CIPHER_ID, IV_LENGTH, TAG_LENGTH};
use crate::core::key::Key;
use crate::core::payload::EncryptedPayload;
use crate::error::{Result, SecretsError};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Generate a new random 256-bit key
#[inline]
pub fn generate_key() -> Key {
    Key::random()
}

/// Encrypt plaintext under `key` (raw or hex) → authenticated payload
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<EncryptedPayload> {
    encrypt_with(plaintext, &Key::from_material(key)?)
}

/// Verify and decrypt `payload` under `key` (raw or hex)
pub fn decrypt(payload: &EncryptedPayload, key: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    decrypt_with(payload, &Key::from_material(key)?)
}

/// Encrypt plaintext in memory with an already normalised key
pub fn encrypt_with(plaintext: &[u8], key: &Key) -> Result<EncryptedPayload> {
    let mut iv = [0u8; IV_LENGTH];
    rand::rng().fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new_from_slices(key.expose_secret(), &iv)
        .map_err(|e| SecretsError::Validation(format!("cipher init failed: {e}")))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let encrypted = STANDARD.encode(&ciphertext);
    let iv = STANDARD.encode(iv);
    let mac = hex::encode(compute_tag(key, CIPHER_ID, &encrypted, &iv)?);

    Ok(EncryptedPayload::new(CIPHER_ID.to_owned(), encrypted, iv, mac))
}

/// Decrypt a payload in memory with an already normalised key
pub fn decrypt_with(payload: &EncryptedPayload, key: &Key) -> Result<Zeroizing<Vec<u8>>> {
    verify_tag(payload, key)?;

    // Authenticated from here on: a foreign id means a payload we produced under
    // a different scheme, never one we should guess at.
    if payload.cipher() != CIPHER_ID {
        return Err(SecretsError::Validation(format!(
            "cipher mismatch: expected {CIPHER_ID}, got {}",
            payload.cipher()
        )));
    }

    let iv = STANDARD
        .decode(payload.iv())
        .map_err(|e| SecretsError::Validation(format!("invalid IV encoding: {e}")))?;
    if iv.len() != IV_LENGTH {
        return Err(SecretsError::Validation(format!(
            "invalid IV length: expected {IV_LENGTH}, got {}",
            iv.len()
        )));
    }
    let ciphertext = STANDARD
        .decode(payload.encrypted())
        .map_err(|e| SecretsError::Validation(format!("invalid ciphertext encoding: {e}")))?;

    let plaintext = Aes256CbcDec::new_from_slices(key.expose_secret(), &iv)
        .map_err(|e| SecretsError::Validation(format!("cipher init failed: {e}")))?
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| SecretsError::Validation("decryption failed: bad padding".to_owned()))?;

    Ok(Zeroizing::new(plaintext))
}

fn compute_tag(key: &Key, cipher: &str, encrypted: &str, iv: &str) -> Result<[u8; TAG_LENGTH]> {
    let mut mac = keyed_mac(key)?;
    mac.update(EncryptedPayload::mac_input(cipher, encrypted, iv).as_bytes());
    let mut tag = [0u8; TAG_LENGTH];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}

fn verify_tag(payload: &EncryptedPayload, key: &Key) -> Result<()> {
    // A tag that is not even hex cannot match anything we produce
    let stored = hex::decode(payload.mac()).map_err(|_| SecretsError::Authentication)?;

    let mut mac = keyed_mac(key)?;
    mac.update(
        EncryptedPayload::mac_input(payload.cipher(), payload.encrypted(), payload.iv()).as_bytes(),
    );
    // `verify_slice` compares in constant time
    mac.verify_slice(&stored)
        .map_err(|_| SecretsError::Authentication)
}

fn keyed_mac(key: &Key) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(key.expose_secret())
        .map_err(|e| SecretsError::Validation(format!("MAC init failed: {e}")))
}
