//! Asset discovery for kit directories
//!
//! A kit is laid out as:
//!
//! ```text
//! kit/
//!   kit.yaml              name, version, structured files
//!   primary/...           installed under the primary root
//!   secondary/...         installed under the secondary root
//! ```
//!
//! Files are listed in path order so installs are deterministic.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{AssetDescriptor, TargetGroup};
use crate::common::FileSystem;
use crate::config::kit::{KIT_FILE, KitDescriptor};
use crate::error::{FsOp, KitError, Result};
use crate::path_utils::to_forward_slashes;

/// Source of the assets an install copies or merges
pub trait AssetProvider {
    /// Every available asset, in install order
    fn list_assets(&self) -> Result<Vec<AssetDescriptor>>;

    /// Version recorded in the lock file
    fn tool_version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

/// [`AssetProvider`] reading a kit directory
#[derive(Debug, Clone)]
pub struct DirectoryAssetProvider {
    root: PathBuf,
    descriptor: KitDescriptor,
}

impl DirectoryAssetProvider {
    /// Open a kit directory and read its `kit.yaml`
    ///
    /// A kit without `kit.yaml` uses the crate version and the default
    /// structured file list.
    pub fn open(fs: &dyn FileSystem, root: &Path) -> Result<Self> {
        if !fs.is_dir(root)? {
            return Err(KitError::InvalidPath {
                path: root.display().to_string(),
            });
        }

        let kit_file = root.join(KIT_FILE);
        let descriptor = match fs.read_optional(&kit_file)? {
            Some(bytes) => {
                let yaml = String::from_utf8(bytes).map_err(|e| KitError::KitConfigParseFailed {
                    path: kit_file.display().to_string(),
                    reason: e.to_string(),
                })?;
                KitDescriptor::from_yaml(&yaml).map_err(|e| KitError::KitConfigParseFailed {
                    path: kit_file.display().to_string(),
                    reason: e.to_string(),
                })?
            }
            None => {
                let name = root
                    .file_name()
                    .map_or_else(|| "kit".to_string(), |n| n.to_string_lossy().into_owned());
                KitDescriptor::fallback(name)
            }
        };

        Ok(Self {
            root: root.to_path_buf(),
            descriptor,
        })
    }

    pub fn descriptor(&self) -> &KitDescriptor {
        &self.descriptor
    }

    fn discover_group(&self, group: TargetGroup) -> Result<Vec<AssetDescriptor>> {
        let group_dir = self.root.join(group.dir_name());
        if !group_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut assets = Vec::new();
        for entry in WalkDir::new(&group_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| walk_error(&group_dir, &e))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&group_dir)
                .map(to_forward_slashes)
                .unwrap_or_else(|_| to_forward_slashes(entry.path()));

            assets.push(AssetDescriptor {
                source_path: entry.path().to_path_buf(),
                is_structured: self.descriptor.is_structured(&relative),
                relative_path: relative,
                target_group: group,
            });
        }
        Ok(assets)
    }
}

fn walk_error(dir: &Path, err: &walkdir::Error) -> KitError {
    let path = err.path().unwrap_or(dir);
    match err.io_error() {
        Some(io) => KitError::from_io(FsOp::Read, path, io),
        None => KitError::FileReadFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        },
    }
}

impl AssetProvider for DirectoryAssetProvider {
    fn list_assets(&self) -> Result<Vec<AssetDescriptor>> {
        let mut assets = self.discover_group(TargetGroup::Primary)?;
        assets.extend(self.discover_group(TargetGroup::Secondary)?);
        Ok(assets)
    }

    fn tool_version(&self) -> String {
        self.descriptor.version.clone()
    }
}
