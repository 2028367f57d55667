// tests/support.rs
//! Test utilities: fixtures, a fault-injecting file system and a scripted editor

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use encrypted_credentials::consts::{BACKUP_MARKER, TEMP_FILE_PREFIX};
use encrypted_credentials::{
    decrypt_with, encrypt_with, EditorLauncher, EncryptedPayload, FileSystem, Key,
    RealFileSystem, SecretsError,
};
use tempfile::TempDir;

pub const PLAINTEXT: &[u8] = b"db:\n  pass: hunter2";

/// A temp dir holding `secrets.yml.enc` encrypted under `master.key`
#[allow(dead_code)]
pub struct Fixture {
    pub dir: TempDir,
    pub credentials: PathBuf,
    pub key_path: PathBuf,
    pub key: Key,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        Self::with_plaintext(PLAINTEXT)
    }

    pub fn with_plaintext(plaintext: &[u8]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let credentials = dir.path().join("secrets.yml.enc");
        let key_path = dir.path().join("master.key");
        let key = Key::random();

        fs::write(&key_path, key.to_hex().as_bytes()).expect("write key");
        let payload = encrypt_with(plaintext, &key).expect("encrypt");
        fs::write(&credentials, payload.to_bytes().expect("serialise")).expect("write creds");

        Self {
            dir,
            credentials,
            key_path,
            key,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Decrypt the real credentials file with `key`
    pub fn decrypt_with(&self, key: &Key) -> Result<Vec<u8>, SecretsError> {
        decrypt_file(&self.credentials, key)
    }

    /// Temp files and backups left in the fixture directory
    pub fn leftovers(&self) -> Vec<String> {
        leftovers(self.dir.path())
    }
}

#[allow(dead_code)]
pub fn decrypt_file(path: &Path, key: &Key) -> Result<Vec<u8>, SecretsError> {
    let payload = EncryptedPayload::from_json(&fs::read(path)?)?;
    Ok(decrypt_with(&payload, key)?.to_vec())
}

#[allow(dead_code)]
pub fn read_key(path: &Path) -> Key {
    Key::from_material(&fs::read(path).expect("read key")).expect("valid key")
}

#[allow(dead_code)]
pub fn leftovers(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read_dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(TEMP_FILE_PREFIX) || name.contains(BACKUP_MARKER))
        .collect();
    names.sort();
    names
}

#[cfg(unix)]
#[allow(dead_code)]
pub fn mode(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).expect("metadata").permissions().mode() & 0o777
}

// ─────────────────────────────────────────────────────────────────────────────
// Fault injection
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(dead_code)]
pub enum Op {
    Read,
    WritePrivate,
    CreateTemp,
    Remove,
    Rename,
    Copy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Fault {
    /// The call returns an I/O error and does nothing
    Fail,
    /// A read succeeds but its last byte is altered
    Corrupt,
}

/// Real file system that misbehaves on the n-th (1-based) call of chosen operations
#[derive(Default)]
pub struct FaultyFs {
    inner: RealFileSystem,
    calls: RefCell<HashMap<Op, usize>>,
    faults: Vec<(Op, usize, Fault)>,
}

#[allow(dead_code)]
impl FaultyFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(mut self, op: Op, nth: usize) -> Self {
        self.faults.push((op, nth, Fault::Fail));
        self
    }

    pub fn corrupt_read(mut self, nth: usize) -> Self {
        self.faults.push((Op::Read, nth, Fault::Corrupt));
        self
    }

    pub fn calls(&self, op: Op) -> usize {
        self.calls.borrow().get(&op).copied().unwrap_or(0)
    }

    fn next(&self, op: Op) -> Option<Fault> {
        let mut calls = self.calls.borrow_mut();
        let n = calls.entry(op).or_insert(0);
        *n += 1;
        let n = *n;
        self.faults
            .iter()
            .find(|(o, nth, _)| *o == op && *nth == n)
            .map(|(_, _, fault)| *fault)
    }

    fn injected(op: Op) -> io::Error {
        io::Error::other(format!("injected {op:?} fault"))
    }
}

impl FileSystem for FaultyFs {
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self.next(Op::Read) {
            Some(Fault::Fail) => Err(Self::injected(Op::Read)),
            Some(Fault::Corrupt) => {
                let mut data = self.inner.read(path)?;
                if let Some(last) = data.last_mut() {
                    *last ^= 0x01;
                }
                Ok(data)
            }
            None => self.inner.read(path),
        }
    }

    fn write_private(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        match self.next(Op::WritePrivate) {
            Some(_) => Err(Self::injected(Op::WritePrivate)),
            None => self.inner.write_private(path, contents),
        }
    }

    fn create_temp(
        &self,
        dir: &Path,
        prefix: &str,
        suffix: &str,
        contents: &[u8],
    ) -> io::Result<PathBuf> {
        match self.next(Op::CreateTemp) {
            Some(_) => Err(Self::injected(Op::CreateTemp)),
            None => self.inner.create_temp(dir, prefix, suffix, contents),
        }
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        match self.next(Op::Remove) {
            Some(_) => Err(Self::injected(Op::Remove)),
            None => self.inner.remove(path),
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        match self.next(Op::Rename) {
            Some(_) => Err(Self::injected(Op::Rename)),
            None => self.inner.rename(from, to),
        }
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        match self.next(Op::Copy) {
            Some(_) => Err(Self::injected(Op::Copy)),
            None => self.inner.copy(from, to),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scripted editor
// ─────────────────────────────────────────────────────────────────────────────

/// What the editor saw when it was launched
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct EditorVisit {
    pub command: String,
    pub path: PathBuf,
    pub contents: Vec<u8>,
    pub mode: u32,
}

/// Stands in for `$EDITOR`: optionally replaces the file, then exits with `exit_code`
#[derive(Default)]
#[allow(dead_code)]
pub struct ScriptedEditor {
    pub replacement: Option<Vec<u8>>,
    pub exit_code: i32,
    pub visit: RefCell<Option<EditorVisit>>,
}

#[allow(dead_code)]
impl ScriptedEditor {
    pub fn writing(contents: &[u8]) -> Self {
        Self {
            replacement: Some(contents.to_vec()),
            ..Self::default()
        }
    }

    pub fn exiting(code: i32) -> Self {
        Self {
            exit_code: code,
            ..Self::default()
        }
    }

    pub fn visit(&self) -> EditorVisit {
        self.visit.borrow().clone().expect("editor was launched")
    }
}

impl EditorLauncher for ScriptedEditor {
    fn launch(&self, command: &str, file: &Path) -> io::Result<i32> {
        #[cfg(unix)]
        let mode = mode(file);
        #[cfg(not(unix))]
        let mode = 0o600;

        *self.visit.borrow_mut() = Some(EditorVisit {
            command: command.to_owned(),
            path: file.to_path_buf(),
            contents: fs::read(file)?,
            mode,
        });
        if let Some(replacement) = &self.replacement {
            fs::write(file, replacement)?;
        }
        Ok(self.exit_code)
    }
}
