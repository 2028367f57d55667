// src/core/mod.rs
pub mod crypto;
pub mod file;
pub mod key;
pub mod payload;
pub mod util;

pub use crypto::*;
pub use file::*;
pub use key::*;
pub use payload::*;
