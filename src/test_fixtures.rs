//! Test fixtures for reducing test setup duplication.
//!
//! - [`FaultyFs`]: a [`FileSystem`] over the real disk that fails chosen reads, writes or removals
//! - [`KitBuilder`]: writes an asset kit directory in a temp dir
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{FaultyFs, KitBuilder};
//!
//! #[test]
//! fn my_test() {
//!     let kit = KitBuilder::new().primary("agents/a.md", "agent").build();
//!     let fs = FaultyFs::new().fail_on_nth_write(2);
//! }
//! ```

#![allow(clippy::expect_used)]

use std::cell::Cell;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::common::{FileSystem, OsFileSystem};
use crate::error::{FsOp, KitError, Result};

/// Real file system with injected failures
pub struct FaultyFs {
    inner: OsFileSystem,
    fail_reads_of: Vec<PathBuf>,
    fail_writes_to: Vec<PathBuf>,
    fail_removes_of: Vec<PathBuf>,
    fail_on_write: Option<usize>,
    error_kind: io::ErrorKind,
    writes: Cell<usize>,
}

impl FaultyFs {
    pub fn new() -> Self {
        Self {
            inner: OsFileSystem,
            fail_reads_of: Vec::new(),
            fail_writes_to: Vec::new(),
            fail_removes_of: Vec::new(),
            fail_on_write: None,
            error_kind: io::ErrorKind::StorageFull,
            writes: Cell::new(0),
        }
    }

    /// Every `read` of `path` fails
    pub fn fail_reads_of(mut self, path: &Path) -> Self {
        self.fail_reads_of.push(path.to_path_buf());
        self
    }

    /// Every `write` to `path` fails
    pub fn fail_writes_to(mut self, path: &Path) -> Self {
        self.fail_writes_to.push(path.to_path_buf());
        self
    }

    /// The `n`th call to `write` (1-based) fails
    pub fn fail_on_nth_write(mut self, n: usize) -> Self {
        self.fail_on_write = Some(n);
        self
    }

    /// Every `remove` of `path` fails
    pub fn fail_removes_of(mut self, path: &Path) -> Self {
        self.fail_removes_of.push(path.to_path_buf());
        self
    }

    /// I/O error kind used for injected failures (default: storage full)
    pub fn with_error_kind(mut self, kind: io::ErrorKind) -> Self {
        self.error_kind = kind;
        self
    }

    /// Number of `write` calls seen so far
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    fn injected(&self, op: FsOp, path: &Path) -> KitError {
        KitError::from_io(
            op,
            path,
            &io::Error::new(self.error_kind, "injected failure"),
        )
    }
}

impl Default for FaultyFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for FaultyFs {
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.inner.create_dir_all(path)
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()> {
        self.inner.copy_file(src, dst)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        if self.fail_reads_of.iter().any(|p| p == path) {
            return Err(self.injected(FsOp::Read, path));
        }
        self.inner.read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let count = self.writes.get() + 1;
        self.writes.set(count);
        if self.fail_on_write == Some(count) || self.fail_writes_to.iter().any(|p| p == path) {
            return Err(self.injected(FsOp::Write, path));
        }
        self.inner.write(path, contents)
    }

    fn remove(&self, path: &Path, force: bool) -> Result<()> {
        if self.fail_removes_of.iter().any(|p| p == path) {
            return Err(self.injected(FsOp::Write, path));
        }
        self.inner.remove(path, force)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn is_dir(&self, path: &Path) -> Result<bool> {
        self.inner.is_dir(path)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        self.inner.list_dir(path)
    }
}

/// Builds an asset kit on disk
pub struct KitBuilder {
    temp: TempDir,
    descriptor: Option<String>,
}

impl KitBuilder {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("Failed to create temp directory"),
            descriptor: Some("name: test-kit\nversion: 1.0.0\n".to_string()),
        }
    }

    /// Replace the `kit.yaml` content; `None` leaves the kit without one
    pub fn descriptor(mut self, yaml: Option<&str>) -> Self {
        self.descriptor = yaml.map(str::to_string);
        self
    }

    /// Add a file under `primary/`
    pub fn primary(self, relative: &str, content: &str) -> Self {
        self.file("primary", relative, content)
    }

    /// Add a file under `secondary/`
    pub fn secondary(self, relative: &str, content: &str) -> Self {
        self.file("secondary", relative, content)
    }

    fn file(self, group: &str, relative: &str, content: &str) -> Self {
        let path = self.temp.path().join("kit").join(group).join(relative);
        std::fs::create_dir_all(path.parent().expect("file has a parent"))
            .expect("Failed to create kit directory");
        std::fs::write(&path, content).expect("Failed to write kit file");
        self
    }

    /// Write `kit.yaml` and return the temp dir with the kit root
    pub fn build(self) -> (TempDir, PathBuf) {
        let root = self.temp.path().join("kit");
        std::fs::create_dir_all(&root).expect("Failed to create kit root");
        if let Some(yaml) = &self.descriptor {
            std::fs::write(root.join("kit.yaml"), yaml).expect("Failed to write kit.yaml");
        }
        (self.temp, root)
    }
}

impl Default for KitBuilder {
    fn default() -> Self {
        Self::new()
    }
}
