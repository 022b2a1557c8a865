//! Transaction support for installs
//!
//! An install records every file and directory it is about to change. If the
//! install does not commit, the recorded changes are undone:
//! - files that did not exist before are removed
//! - files that existed are written back with their original bytes
//! - directories created by the install are removed when empty, deepest first
//!
//! Undo is best-effort: a failure on one path is logged and the rest are still
//! processed.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = Transaction::new(fs);
//! transaction.ensure_dir(&parent)?;
//! transaction.track_write(&dest)?;
//! fs.write(&dest, bytes)?;
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // rollback happens automatically
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::common::FileSystem;
use crate::error::{KitError, Result};

/// Original content of a file the transaction overwrote
#[derive(Debug, Clone)]
struct FileBackup {
    path: PathBuf,
    content: Vec<u8>,
}

/// A transaction over file system changes made by one install
pub struct Transaction<'a> {
    fs: &'a dyn FileSystem,

    /// Files created during this transaction, in creation order
    created_files: Vec<PathBuf>,

    /// Files modified during this transaction (with original content)
    modified_files: Vec<FileBackup>,

    /// Directories created during this transaction
    created_dirs: Vec<PathBuf>,

    /// Whether the transaction has been committed
    committed: bool,
}

impl<'a> Transaction<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self {
            fs,
            created_files: Vec::new(),
            modified_files: Vec::new(),
            created_dirs: Vec::new(),
            committed: false,
        }
    }

    fn is_tracked(&self, path: &Path) -> bool {
        self.created_files.iter().any(|p| p == path)
            || self.modified_files.iter().any(|b| b.path == path)
    }

    /// Record a file before it is written
    ///
    /// The first call for a path decides how it is undone: a missing file is
    /// removed on rollback, an existing one gets its current bytes back.
    pub fn track_write(&mut self, path: &Path) -> Result<()> {
        if self.is_tracked(path) {
            return Ok(());
        }
        match self.fs.read_optional(path)? {
            Some(content) => self.modified_files.push(FileBackup {
                path: path.to_path_buf(),
                content,
            }),
            None => self.created_files.push(path.to_path_buf()),
        }
        Ok(())
    }

    /// Create a directory and its missing parents, recording the ones created
    pub fn ensure_dir(&mut self, dir: &Path) -> Result<()> {
        let mut missing = Vec::new();
        let mut current = Some(dir);
        while let Some(path) = current {
            if self.fs.exists(path) {
                break;
            }
            missing.push(path.to_path_buf());
            current = path.parent();
        }
        if missing.is_empty() {
            return Ok(());
        }

        self.fs.create_dir_all(dir)?;
        self.created_dirs.extend(missing);
        Ok(())
    }

    /// Commit the transaction (prevent rollback)
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Undo every recorded change
    ///
    /// Returns the failures; each one has already been logged.
    pub fn rollback(&mut self) -> Vec<(PathBuf, KitError)> {
        if self.committed {
            return Vec::new();
        }
        self.committed = true;
        let mut failures = Vec::new();

        for path in self.created_files.iter().rev() {
            if let Err(e) = self.fs.remove(path, true) {
                warn!(path = %path.display(), error = %e, "rollback: failed to remove file");
                failures.push((path.clone(), e));
            }
        }

        for backup in self.modified_files.iter().rev() {
            if let Err(e) = self.fs.write(&backup.path, &backup.content) {
                warn!(path = %backup.path.display(), error = %e, "rollback: failed to restore file");
                failures.push((backup.path.clone(), e));
            }
        }

        let mut dirs: Vec<&PathBuf> = self.created_dirs.iter().collect();
        dirs.sort_by_key(|d| std::cmp::Reverse(d.components().count()));
        for dir in dirs {
            let is_empty = self
                .fs
                .list_dir(dir)
                .map(|names| names.is_empty())
                .unwrap_or(false);
            if is_empty {
                if let Err(e) = self.fs.remove(dir, true) {
                    warn!(path = %dir.display(), error = %e, "rollback: failed to remove directory");
                }
            }
        }

        debug!(
            removed = self.created_files.len(),
            restored = self.modified_files.len(),
            failed = failures.len(),
            "rolled back install"
        );
        failures
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            // Automatic rollback on drop if not committed
            self.rollback();
        }
    }
}
