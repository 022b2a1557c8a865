//! Configuration file handling for agentkit
//!
//! This module contains data structures for:
//! - `<primary>/.lock` - lock file of installed files and their checksums
//! - `settings.json` - the user's settings document that hooks are merged into
//! - `kit.yaml` - descriptor of an asset kit
//! - [`InstallConfig`] - resolved target roots for one run

pub mod kit;
pub mod lockfile;
pub mod settings;

use std::path::{Path, PathBuf};

use crate::path_utils::normalize_root;

// Re-export commonly used types
pub use kit::KitDescriptor;
pub use lockfile::{FileRecord, Manifest, ManifestStore};
pub use settings::{HookEntry, HookMap, SettingsDocument};

/// Default lock file name inside the primary root
pub const LOCK_FILE_NAME: &str = ".lock";

pub const DEFAULT_PRIMARY_DIR: &str = "~/.claude";
pub const DEFAULT_SECONDARY_DIR: &str = "~/.agentkit";
pub const DEFAULT_ASSETS_DIR: &str = "kit";

/// Resolved target locations for an install, uninstall or status run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    pub primary_root: PathBuf,
    pub secondary_root: PathBuf,
    pub manifest_path: PathBuf,
}

impl InstallConfig {
    /// Normalize user supplied roots against `cwd`
    ///
    /// Without an explicit lock file path the lock file lives at
    /// `<primary>/.lock`.
    pub fn resolve(
        primary: &Path,
        secondary: &Path,
        manifest: Option<&Path>,
        cwd: &Path,
    ) -> Self {
        let primary_root = normalize_root(primary, cwd);
        let secondary_root = normalize_root(secondary, cwd);
        let manifest_path = manifest.map_or_else(
            || primary_root.join(LOCK_FILE_NAME),
            |path| normalize_root(path, cwd),
        );

        Self {
            primary_root,
            secondary_root,
            manifest_path,
        }
    }
}
