//! Removal of installed assets
//!
//! Only files recorded in the lock file are deleted, so user files living
//! next to installed ones survive. A record naming a directory is reported
//! and kept. Hooks are stripped from settings files the
//! kit ships; the rest of those documents stays.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{InstallSelection, Installer, SettingsMerger, TargetGroup};
use crate::common::fs::prune_empty_dirs;
use crate::config::lockfile::FileRecord;
use crate::error::{KitError, Result};

/// Outcome of [`Installer::uninstall`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallResult {
    pub success: bool,
    pub removed_paths: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl Installer<'_> {
    /// Remove everything installed under the selected roots
    ///
    /// Individual removal failures are collected and the run continues. The
    /// lock file keeps records that were not removed.
    pub fn uninstall(&self, selection: InstallSelection) -> UninstallResult {
        let mut result = UninstallResult::default();

        if let Err(e) = self.run_uninstall(selection, &mut result) {
            warn!(error = %e, "uninstall failed");
            result.errors.push(e.user_message());
        }

        result.success = result.errors.is_empty();
        info!(
            removed = result.removed_paths.len(),
            errors = result.errors.len(),
            "uninstall complete"
        );
        result
    }

    fn run_uninstall(&self, selection: InstallSelection, result: &mut UninstallResult) -> Result<()> {
        let store = self.store();
        let manifest = store.read()?;

        self.strip_structured_hooks(selection, result);

        let Some(manifest) = manifest else {
            debug!(path = %store.path().display(), "no lock file, nothing recorded to remove");
            return Ok(());
        };

        let mut remaining: Vec<FileRecord> = Vec::new();
        for record in manifest.records() {
            if !self.is_selected_path(selection, &record.path) {
                remaining.push(record.clone());
                continue;
            }

            let path = PathBuf::from(&record.path);
            if self.fs.is_dir(&path).unwrap_or(false) {
                let e = KitError::NotAFile {
                    path: path.display().to_string(),
                };
                warn!(path = %path.display(), "lock file records a directory, leaving it in place");
                result.errors.push(e.user_message());
                remaining.push(record.clone());
                continue;
            }
            match self.fs.remove(&path, true) {
                Ok(()) => {
                    debug!(path = %path.display(), "removed");
                    if let Some(parent) = path.parent() {
                        prune_empty_dirs(self.fs, parent, self.owning_root(&path));
                    }
                    result.removed_paths.push(path);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove");
                    result.errors.push(e.user_message());
                    remaining.push(record.clone());
                }
            }
        }

        if remaining.is_empty() {
            store.remove()?;
            debug!(path = %store.path().display(), "removed lock file");
        } else {
            store
                .write(&remaining, &manifest.tool_version)
                .map_err(|e| KitError::manifest_write(store.path().display().to_string(), e))?;
        }
        Ok(())
    }

    /// Remove the `hooks` map from every structured destination
    fn strip_structured_hooks(&self, selection: InstallSelection, result: &mut UninstallResult) {
        let assets = match self.selected_assets(selection) {
            Ok(assets) => assets,
            Err(e) => {
                warn!(error = %e, "asset list unavailable, leaving settings hooks in place");
                return;
            }
        };

        let merger = SettingsMerger::new(self.fs);
        for asset in assets.iter().filter(|asset| asset.is_structured) {
            let dest = self.destination(asset);
            if let Err(e) = merger.remove_hooks(&dest) {
                warn!(path = %dest.display(), error = %e, "failed to remove hooks");
                result.errors.push(e.user_message());
            }
        }
    }

    fn owning_root(&self, path: &Path) -> &Path {
        [TargetGroup::Primary, TargetGroup::Secondary]
            .into_iter()
            .map(|group| self.root(group))
            .find(|root| path.starts_with(root))
            .unwrap_or(self.config.primary_root.as_path())
    }
}
