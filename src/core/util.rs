//! Small path helpers used across the core module
//!
//! Keep this light; split it if it grows.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use rand::RngCore;

/// Directory that holds `path`, `.` for bare file names
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `path` with `suffix` appended to its file name, in the same directory
pub fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("credentials"));
    name.push(suffix);
    parent_dir(path).join(name)
}

/// 16 lowercase hex chars from the thread RNG
pub fn random_suffix() -> String {
    let mut bytes = [0u8; 8];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
