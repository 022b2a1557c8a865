//! File system port
//!
//! Every component that touches disk takes a `&dyn FileSystem` at
//! construction instead of calling `std::fs` directly, so tests can swap in
//! a fault-injecting implementation.
//!
//! All operations report "not found" as [`KitError::InvalidPath`], distinct
//! from other I/O failures.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::fs::{read_error, write_error};
use crate::error::{KitError, Result};

/// File system operations needed by the installer
pub trait FileSystem {
    /// Create a directory and all missing parents
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Copy a file's bytes from `src` to `dst`, overwriting `dst`
    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()>;

    /// Read a whole file
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write a whole file, replacing any previous content
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Remove a file or an empty directory
    ///
    /// With `force`, a missing path is not an error. Directory trees are
    /// never removed recursively.
    fn remove(&self, path: &Path, force: bool) -> Result<()>;

    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory
    fn is_dir(&self, path: &Path) -> Result<bool>;

    /// Names of the entries directly inside `path`, sorted
    fn list_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Read a file, mapping "not found" to `None`
    fn read_optional(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match self.read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// [`FileSystem`] backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(write_error(path))
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()> {
        if !src.is_file() {
            return Err(KitError::InvalidPath {
                path: src.display().to_string(),
            });
        }
        fs::copy(src, dst).map(|_| ()).map_err(write_error(dst))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(read_error(path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).map_err(write_error(path))
    }

    fn remove(&self, path: &Path, force: bool) -> Result<()> {
        let result = match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir(path),
            Ok(_) => fs::remove_file(path),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if force && e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KitError::from_io(crate::error::FsOp::Write, path, &e)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> Result<bool> {
        fs::metadata(path)
            .map(|meta| meta.is_dir())
            .map_err(read_error(path))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let mut names = fs::read_dir(path)
            .map_err(read_error(path))?
            .map(|entry| {
                entry
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .map_err(read_error(path))
            })
            .collect::<Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }
}

/// Remove directories left empty under `stop_at`, walking up from `start`
///
/// `stop_at` itself is never removed. Returns the directories removed.
pub fn prune_empty_dirs(fs: &dyn FileSystem, start: &Path, stop_at: &Path) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    let mut current = Some(start);

    while let Some(dir) = current {
        if dir == stop_at || !dir.starts_with(stop_at) {
            break;
        }
        let is_empty = fs.list_dir(dir).map(|names| names.is_empty()).unwrap_or(false);
        if !is_empty || fs.remove(dir, true).is_err() {
            break;
        }
        removed.push(dir.to_path_buf());
        current = dir.parent();
    }

    removed
}
