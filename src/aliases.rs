// src/aliases.rs
//! secure-gate secret types used by this crate
//!
//! Zeroized on drop, redacted in `Debug`, random and hex helpers from the
//! `rand` / `conversions` features.

pub use secure_gate::{fixed_alias, SecureConversionsExt, SecureRandomExt};

fixed_alias!(Key32, 32); // 256-bit AES key, also the HMAC key
