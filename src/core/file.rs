//! File-system collaborator
//!
//! Every read and write the store and the rotation transaction perform goes
//! through [`FileSystem`], so tests can inject faults at any step. Anything
//! this crate creates (keys, credentials, backups, temp files) is owner-only.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::consts::OWNER_ONLY_MODE;

pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace `path` with `contents`, owner-only permissions
    fn write_private(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Create an unpredictably named owner-only file in `dir` and return its path
    fn create_temp(
        &self,
        dir: &Path,
        prefix: &str,
        suffix: &str,
        contents: &[u8],
    ) -> io::Result<PathBuf>;

    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Atomic replace of `to` by `from` (same file system)
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Copy `from` to `to`; the copy is owner-only
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by `std::fs` and `tempfile`
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_private(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let dir = crate::core::util::parent_dir(path);
        fs::create_dir_all(&dir)?;
        // Write beside the target then persist: readers never see a torn file
        let mut tmp = tempfile::Builder::new()
            .prefix(crate::consts::TEMP_FILE_PREFIX)
            .tempfile_in(&dir)?;
        restrict_permissions(tmp.path())?;
        tmp.write_all(contents)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn create_temp(
        &self,
        dir: &Path,
        prefix: &str,
        suffix: &str,
        contents: &[u8],
    ) -> io::Result<PathBuf> {
        let mut tmp = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(dir)?;
        restrict_permissions(tmp.path())?;
        tmp.write_all(contents)?;
        tmp.as_file().sync_all()?;
        let (_, path) = tmp.keep().map_err(|e| e.error)?;
        Ok(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::copy(from, to)?;
        restrict_permissions(to)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(OWNER_ONLY_MODE))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    let _ = OWNER_ONLY_MODE;
    Ok(())
}

/// Scoped temporary file: removed on drop unless [`TempArtifact::keep`] is called
pub struct TempArtifact<'a> {
    fs: &'a dyn FileSystem,
    path: Option<PathBuf>,
}

impl<'a> TempArtifact<'a> {
    pub fn create(
        fs: &'a dyn FileSystem,
        dir: &Path,
        prefix: &str,
        suffix: &str,
        contents: &[u8],
    ) -> io::Result<Self> {
        let path = fs.create_temp(dir, prefix, suffix, contents)?;
        Ok(Self {
            fs,
            path: Some(path),
        })
    }

    /// Take ownership of a file about to be created at `path` (backups).
    /// Adopt before writing so a half-written file is still cleaned up.
    pub fn adopt(fs: &'a dyn FileSystem, path: PathBuf) -> Self {
        Self {
            fs,
            path: Some(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// The file was consumed (renamed away); nothing left to clean up
    pub fn keep(mut self) -> PathBuf {
        self.path.take().unwrap_or_default()
    }
}

impl Drop for TempArtifact<'_> {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if self.fs.exists(&path) {
                if let Err(e) = self.fs.remove(&path) {
                    warn!(path = %path.display(), error = %e, "failed to remove temporary file");
                }
            }
        }
    }
}
