//! Reading, writing and comparing the lock file on disk

use std::path::{Path, PathBuf};

use tracing::debug;

use super::serialization::{parse_manifest, render_manifest};
use super::{FileRecord, Manifest};
use crate::common::FileSystem;
use crate::error::{KitError, Result};
use crate::hash::generate_checksum;
use crate::path_utils::to_forward_slashes;

/// Lock file at a fixed path, accessed through a [`FileSystem`]
pub struct ManifestStore<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
}

impl<'a> ManifestStore<'a> {
    pub fn new(fs: &'a dyn FileSystem, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the lock file
    ///
    /// Returns `Ok(None)` when no lock file exists and
    /// [`KitError::ManifestParseFailed`] when it exists but is not valid.
    pub fn read(&self) -> Result<Option<Manifest>> {
        let Some(bytes) = self.fs.read_optional(&self.path)? else {
            return Ok(None);
        };

        let parse_failed = |reason: String| KitError::ManifestParseFailed {
            path: self.path.display().to_string(),
            reason,
        };
        let json = String::from_utf8(bytes).map_err(|e| parse_failed(e.to_string()))?;
        let manifest = parse_manifest(&json).map_err(|e| parse_failed(e.to_string()))?;

        if manifest.is_legacy() {
            debug!(path = %self.path.display(), "read legacy lock file, checksums unknown");
        }
        Ok(Some(manifest))
    }

    /// Replace the lock file with a schema 2 document built from `records`
    pub fn write(&self, records: &[FileRecord], tool_version: &str) -> Result<Manifest> {
        let manifest = Manifest::new(records.iter().cloned(), tool_version);
        let json = render_manifest(&manifest).map_err(|e| KitError::FileWriteFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.write(&self.path, json.as_bytes())?;

        debug!(
            path = %self.path.display(),
            files = manifest.files.len(),
            "wrote lock file"
        );
        Ok(manifest)
    }

    /// Delete the lock file; a missing file is not an error
    pub fn remove(&self) -> Result<()> {
        self.fs.remove(&self.path, true)
    }

    /// Select the targets whose installed copy cannot be trusted
    ///
    /// Without a lock file every target is returned. Otherwise a target is
    /// returned when it is not recorded, when its record has no checksum, or
    /// when the file on disk no longer hashes to the recorded checksum. A
    /// changed checksum cannot tell a user edit from an upstream change.
    ///
    /// Returned records carry the checksum currently on disk (`None` when the
    /// file is missing).
    pub fn files_needing_reinstall(&self, targets: &[PathBuf]) -> Result<Vec<FileRecord>> {
        let manifest = self.read()?;
        let mut stale = Vec::new();

        for target in targets {
            let path = to_forward_slashes(target);
            let current = self.current_checksum(target)?;

            let needs_reinstall = match manifest.as_ref() {
                None => true,
                Some(manifest) => match manifest.find(&path) {
                    None => true,
                    Some(FileRecord { checksum: None, .. }) => true,
                    Some(FileRecord {
                        checksum: Some(recorded),
                        ..
                    }) => current.as_deref() != Some(recorded.as_str()),
                },
            };

            if needs_reinstall {
                stale.push(FileRecord {
                    path,
                    checksum: current,
                });
            }
        }

        Ok(stale)
    }

    fn current_checksum(&self, target: &Path) -> Result<Option<String>> {
        match generate_checksum(self.fs, target) {
            Ok(checksum) => Ok(Some(checksum)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
