//! Install engine
//!
//! [`Installer`] ties the pieces together for one run:
//! - asks an [`AssetProvider`] for assets and keeps the selected target groups
//! - copies plain assets with placeholder substitution, skipping files whose
//!   installed copy still matches the lock file
//! - merges structured assets into the user's settings through [`SettingsMerger`]
//! - records checksums of everything copied and writes the lock file last
//!
//! Any failure undoes the run through a [`Transaction`] and is reported as a
//! failed [`InstallResult`]; no error crosses `install`/`uninstall`.

pub mod discovery;
pub mod placeholders;
pub mod settings;
mod uninstall;


use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use discovery::{AssetProvider, DirectoryAssetProvider};
pub use placeholders::PlaceholderMap;
pub use settings::SettingsMerger;
pub use uninstall::UninstallResult;

use crate::common::FileSystem;
use crate::config::lockfile::{FileRecord, Manifest, ManifestStore};
use crate::config::{InstallConfig, SettingsDocument};
use crate::error::{KitError, Result};
use crate::hash::{checksum_bytes, generate_checksum};
use crate::path_utils::to_forward_slashes;
use crate::transaction::Transaction;

/// Label passed to the progress callback for the lock file step
pub const WRITE_LOCK_FILE_STAGE: &str = "Writing lock file";

/// Progress callback: `(stage label, current index, total count)`
pub type ProgressFn<'p> = &'p mut dyn FnMut(&str, usize, usize);

/// Which target root an asset is installed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetGroup {
    Primary,
    Secondary,
}

impl TargetGroup {
    /// Directory name of this group inside a kit
    pub fn dir_name(self) -> &'static str {
        match self {
            TargetGroup::Primary => "primary",
            TargetGroup::Secondary => "secondary",
        }
    }
}

/// One installable file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub source_path: PathBuf,
    /// Path below the target root, forward slashes
    pub relative_path: String,
    pub target_group: TargetGroup,
    /// Merged into an existing settings file instead of being copied
    pub is_structured: bool,
}

/// Target groups chosen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallSelection {
    pub primary: bool,
    pub secondary: bool,
}

impl InstallSelection {
    pub fn all() -> Self {
        Self {
            primary: true,
            secondary: true,
        }
    }

    pub fn includes(self, group: TargetGroup) -> bool {
        match group {
            TargetGroup::Primary => self.primary,
            TargetGroup::Secondary => self.secondary,
        }
    }

    pub fn is_empty(self) -> bool {
        !self.primary && !self.secondary
    }
}

impl Default for InstallSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Outcome of [`Installer::install`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallResult {
    pub success: bool,
    /// Destinations of every processed asset, empty on failure
    pub installed_paths: Vec<PathBuf>,
    /// Destinations left untouched because they already matched
    pub unchanged_paths: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl InstallResult {
    fn failed(error: &KitError) -> Self {
        Self {
            success: false,
            installed_paths: Vec::new(),
            unchanged_paths: Vec::new(),
            errors: vec![error.user_message()],
        }
    }
}

/// What a successful run produced
#[derive(Debug, Default)]
struct InstallOutcome {
    installed: Vec<PathBuf>,
    unchanged: Vec<PathBuf>,
    copied: Vec<PathBuf>,
}

/// Installs, checks and removes assets under two target roots
pub struct Installer<'a> {
    fs: &'a dyn FileSystem,
    provider: &'a dyn AssetProvider,
    config: InstallConfig,
}

impl<'a> Installer<'a> {
    pub fn new(fs: &'a dyn FileSystem, provider: &'a dyn AssetProvider, config: InstallConfig) -> Self {
        Self {
            fs,
            provider,
            config,
        }
    }

    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    fn store(&self) -> ManifestStore<'a> {
        ManifestStore::new(self.fs, &self.config.manifest_path)
    }

    fn placeholders(&self) -> PlaceholderMap {
        PlaceholderMap::new(&self.config.primary_root, &self.config.secondary_root)
    }

    fn root(&self, group: TargetGroup) -> &Path {
        match group {
            TargetGroup::Primary => &self.config.primary_root,
            TargetGroup::Secondary => &self.config.secondary_root,
        }
    }

    /// Where an asset is installed
    pub fn destination(&self, asset: &AssetDescriptor) -> PathBuf {
        self.root(asset.target_group).join(&asset.relative_path)
    }

    /// Whether a recorded path lives under a selected root
    fn is_selected_path(&self, selection: InstallSelection, path: &str) -> bool {
        [TargetGroup::Primary, TargetGroup::Secondary]
            .into_iter()
            .filter(|group| selection.includes(*group))
            .any(|group| Path::new(path).starts_with(self.root(group)))
    }

    fn selected_assets(&self, selection: InstallSelection) -> Result<Vec<AssetDescriptor>> {
        Ok(self
            .provider
            .list_assets()?
            .into_iter()
            .filter(|asset| selection.includes(asset.target_group))
            .collect())
    }

    /// Install the selected asset groups
    ///
    /// On failure every file written by this call is removed (or restored to
    /// its previous content) and the lock file is left as it was.
    pub fn install(
        &self,
        selection: InstallSelection,
        progress: Option<ProgressFn<'_>>,
    ) -> InstallResult {
        let mut transaction = Transaction::new(self.fs);

        match self.run_install(selection, &mut transaction, progress) {
            Ok(outcome) => {
                transaction.commit();
                info!(
                    installed = outcome.installed.len(),
                    copied = outcome.copied.len(),
                    unchanged = outcome.unchanged.len(),
                    "install complete"
                );
                InstallResult {
                    success: true,
                    installed_paths: outcome.installed,
                    unchanged_paths: outcome.unchanged,
                    errors: Vec::new(),
                }
            }
            Err(e) => {
                warn!(error = %e, "install failed, rolling back");
                let failures = transaction.rollback();
                if !failures.is_empty() {
                    warn!(count = failures.len(), "rollback left files behind");
                }
                InstallResult::failed(&e)
            }
        }
    }

    fn run_install(
        &self,
        selection: InstallSelection,
        transaction: &mut Transaction<'_>,
        mut progress: Option<ProgressFn<'_>>,
    ) -> Result<InstallOutcome> {
        let store = self.store();
        let assets = self.selected_assets(selection)?;
        let placeholders = self.placeholders();

        for group in [TargetGroup::Primary, TargetGroup::Secondary] {
            if selection.includes(group) {
                transaction.ensure_dir(self.root(group))?;
            }
        }

        let previous = store.read()?;
        let targets: Vec<PathBuf> = assets
            .iter()
            .filter(|asset| !asset.is_structured)
            .map(|asset| self.destination(asset))
            .collect();
        let stale: HashSet<String> = store
            .files_needing_reinstall(&targets)?
            .into_iter()
            .map(|record| record.path)
            .collect();

        let total = assets.len() + 1;
        let mut outcome = InstallOutcome::default();

        for (index, asset) in assets.iter().enumerate() {
            if let Some(report) = progress.as_mut() {
                report(&asset.relative_path, index + 1, total);
            }

            let dest = self.destination(asset);
            let step = if asset.is_structured {
                self.merge_structured(asset, &dest, &placeholders, transaction)
            } else {
                let recorded = previous
                    .as_ref()
                    .filter(|_| !stale.contains(&to_forward_slashes(&dest)))
                    .and_then(|manifest| manifest.find(&to_forward_slashes(&dest)))
                    .and_then(|record| record.checksum.as_deref());
                self.copy_asset(asset, &dest, &placeholders, recorded, transaction)
            };
            let written =
                step.map_err(|e| KitError::asset_copy(dest.display().to_string(), e))?;

            if written {
                if !asset.is_structured {
                    outcome.copied.push(dest.clone());
                }
            } else {
                outcome.unchanged.push(dest.clone());
            }
            outcome.installed.push(dest);
        }

        let mut records = self.carried_over_records(selection, previous.as_ref());
        for asset in assets.iter().filter(|asset| !asset.is_structured) {
            let dest = self.destination(asset);
            records.push(FileRecord::new(
                to_forward_slashes(&dest),
                generate_checksum(self.fs, &dest)?,
            ));
        }

        if let Some(report) = progress.as_mut() {
            report(WRITE_LOCK_FILE_STAGE, total, total);
        }
        let manifest_path = store.path().to_path_buf();
        let write_manifest = |transaction: &mut Transaction<'_>| -> Result<()> {
            if let Some(parent) = manifest_path.parent() {
                transaction.ensure_dir(parent)?;
            }
            transaction.track_write(&manifest_path)?;
            store.write(&records, &self.provider.tool_version())?;
            Ok(())
        };
        write_manifest(transaction)
            .map_err(|e| KitError::manifest_write(manifest_path.display().to_string(), e))?;

        Ok(outcome)
    }

    /// Records of groups this run did not touch
    fn carried_over_records(
        &self,
        selection: InstallSelection,
        previous: Option<&Manifest>,
    ) -> Vec<FileRecord> {
        previous
            .map(|manifest| {
                manifest
                    .records()
                    .filter(|record| !self.is_selected_path(selection, &record.path))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Copy a plain asset, returning whether the destination was written
    ///
    /// `recorded` is the lock file checksum of a destination that still
    /// matches it on disk; equal rendered content means nothing to write.
    fn copy_asset(
        &self,
        asset: &AssetDescriptor,
        dest: &Path,
        placeholders: &PlaceholderMap,
        recorded: Option<&str>,
        transaction: &mut Transaction<'_>,
    ) -> Result<bool> {
        let rendered = placeholders.substitute_bytes(self.fs.read(&asset.source_path)?);

        if recorded == Some(checksum_bytes(&rendered).as_str()) {
            debug!(path = %dest.display(), "unchanged, skipping");
            return Ok(false);
        }

        if let Some(parent) = dest.parent() {
            transaction.ensure_dir(parent)?;
        }
        transaction.track_write(dest)?;
        self.fs.write(dest, &rendered)?;
        debug!(path = %dest.display(), "installed");
        Ok(true)
    }

    fn merge_structured(
        &self,
        asset: &AssetDescriptor,
        dest: &Path,
        placeholders: &PlaceholderMap,
        transaction: &mut Transaction<'_>,
    ) -> Result<bool> {
        let source = self.fs.read(&asset.source_path)?;
        let fragment = std::str::from_utf8(&source)
            .map_err(|e| e.to_string())
            .and_then(SettingsDocument::from_json)
            .map_err(|reason| KitError::SettingsParseFailed {
                path: asset.source_path.display().to_string(),
                reason,
            })?;

        if let Some(parent) = dest.parent() {
            transaction.ensure_dir(parent)?;
        }
        transaction.track_write(dest)?;
        let before = self.fs.read_optional(dest)?;
        SettingsMerger::new(self.fs).merge_fragment(dest, &fragment, placeholders)?;
        let changed = self.fs.read_optional(dest)? != before;
        debug!(path = %dest.display(), changed, "merged settings");
        Ok(changed)
    }

    /// Installed files that a reinstall would rewrite
    pub fn status(&self, selection: InstallSelection) -> Result<Vec<FileRecord>> {
        let targets: Vec<PathBuf> = self
            .selected_assets(selection)?
            .iter()
            .filter(|asset| !asset.is_structured)
            .map(|asset| self.destination(asset))
            .collect();
        self.store().files_needing_reinstall(&targets)
    }
}
