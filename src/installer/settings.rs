//! Hook-preserving merges into the user's settings file
//!
//! Both operations run as a small transaction:
//! - the document is parsed and changed in memory
//! - a change that leaves the document as it was writes nothing
//! - otherwise an existing file is copied to a timestamped sibling, then the
//!   document is written back
//! - on success the backup is deleted
//! - on failure the backup is copied back (a file that did not exist before is
//!   removed again) and the error is returned
//!
//! Keys other than `hooks` that already exist are never modified. A `hooks`
//! key holding `null` counts as absent.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::placeholders::PlaceholderMap;
use crate::common::FileSystem;
use crate::config::settings::{HOOKS_KEY, HookMap, SettingsDocument, parse_hook_map};
use crate::error::{KitError, Result};
use crate::merge::merge_maps;

/// Merges hooks into, and removes them from, settings files
pub struct SettingsMerger<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> SettingsMerger<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Add hooks that are not present yet
    ///
    /// A hook whose name already exists is left exactly as the user has it.
    /// Placeholders are substituted in the `command` of added hooks only.
    pub fn merge_hooks(
        &self,
        path: &Path,
        new_hooks: &HookMap,
        placeholders: &PlaceholderMap,
    ) -> Result<SettingsDocument> {
        self.transact(path, |document| {
            add_missing_hooks(path, document, new_hooks, placeholders)
        })
    }

    /// Merge a whole settings fragment shipped by a kit
    ///
    /// The fragment's `hooks` go through [`SettingsMerger::merge_hooks`] rules.
    /// Its other top-level keys are only added when the user's document does
    /// not have them yet.
    pub fn merge_fragment(
        &self,
        path: &Path,
        fragment: &SettingsDocument,
        placeholders: &PlaceholderMap,
    ) -> Result<SettingsDocument> {
        let new_hooks = match fragment.get(HOOKS_KEY).filter(|hooks| !hooks.is_null()) {
            Some(hooks) => parse_hook_map(hooks).map_err(|reason| KitError::SettingsParseFailed {
                path: path.display().to_string(),
                reason,
            })?,
            None => HookMap::new(),
        };

        self.transact(path, |document| {
            let seeded: Map<String, Value> = fragment
                .as_map()
                .iter()
                .filter(|(key, value)| {
                    key.as_str() != HOOKS_KEY && !value.is_null() && document.get(key).is_none()
                })
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            let document = SettingsDocument::from_map(merge_maps(document.into_map(), seeded));
            add_missing_hooks(path, document, &new_hooks, placeholders)
        })
    }

    /// Delete the whole `hooks` map, keeping every other key
    ///
    /// Without a settings file this is a no-op returning an empty document.
    pub fn remove_hooks(&self, path: &Path) -> Result<SettingsDocument> {
        if !self.fs.exists(path) {
            return Ok(SettingsDocument::new());
        }
        self.transact(path, |mut document| {
            document.remove_hooks();
            Ok(document)
        })
    }

    fn transact<F>(&self, path: &Path, change: F) -> Result<SettingsDocument>
    where
        F: FnOnce(SettingsDocument) -> Result<SettingsDocument>,
    {
        let original = self.fs.read_optional(path)?;
        let document = parse_settings(path, original.as_deref())?;

        let merged = match change(document.clone()) {
            Ok(merged) => merged,
            Err(e) => return Err(KitError::merge_transaction(path.display().to_string(), e)),
        };
        if original.is_some() && merged == document {
            debug!(path = %path.display(), "settings already up to date");
            return Ok(merged);
        }

        let backup = match original {
            Some(_) => Some(self.create_backup(path)?),
            None => None,
        };
        match self.write_settings(path, merged) {
            Ok(merged) => {
                self.discard_backup(backup.as_deref());
                Ok(merged)
            }
            Err(e) => {
                self.restore(path, backup.as_deref());
                Err(KitError::merge_transaction(path.display().to_string(), e))
            }
        }
    }

    fn write_settings(&self, path: &Path, document: SettingsDocument) -> Result<SettingsDocument> {
        let json = document.to_json().map_err(|e| KitError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.write(path, json.as_bytes())?;
        Ok(document)
    }

    fn create_backup(&self, path: &Path) -> Result<PathBuf> {
        let backup = backup_path(path);
        self.fs.copy_file(path, &backup)?;
        debug!(backup = %backup.display(), "backed up settings");
        Ok(backup)
    }

    fn discard_backup(&self, backup: Option<&Path>) {
        if let Some(backup) = backup {
            if let Err(e) = self.fs.remove(backup, true) {
                warn!(backup = %backup.display(), error = %e, "failed to delete settings backup");
            }
        }
    }

    fn restore(&self, path: &Path, backup: Option<&Path>) {
        let restored = match backup {
            Some(backup) => self
                .fs
                .copy_file(backup, path)
                .and_then(|()| self.fs.remove(backup, true)),
            None => self.fs.remove(path, true),
        };
        if let Err(e) = restored {
            warn!(path = %path.display(), error = %e, "failed to restore settings file");
        }
    }
}

/// Sibling backup name, e.g. `settings.json.backup-20240501T100000123Z`
fn backup_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "settings".into(), |n| n.to_string_lossy());
    let stamp = Utc::now().format("%Y%m%dT%H%M%S%3fZ");
    path.with_file_name(format!("{name}.backup-{stamp}"))
}

fn parse_settings(path: &Path, bytes: Option<&[u8]>) -> Result<SettingsDocument> {
    let Some(bytes) = bytes else {
        return Ok(SettingsDocument::new());
    };
    let parse_failed = |reason: String| KitError::SettingsParseFailed {
        path: path.display().to_string(),
        reason,
    };
    let text = std::str::from_utf8(bytes).map_err(|e| parse_failed(e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(SettingsDocument::new());
    }
    SettingsDocument::from_json(text).map_err(parse_failed)
}

fn add_missing_hooks(
    path: &Path,
    document: SettingsDocument,
    new_hooks: &HookMap,
    placeholders: &PlaceholderMap,
) -> Result<SettingsDocument> {
    if let Some(existing) = document.get(HOOKS_KEY) {
        if !existing.is_object() && !existing.is_null() {
            return Err(KitError::SettingsParseFailed {
                path: path.display().to_string(),
                reason: format!("`{HOOKS_KEY}` must be an object"),
            });
        }
    }

    let mut additions = Map::new();
    for (name, hook) in new_hooks {
        if document.has_hook(name) || additions.contains_key(name) {
            debug!(hook = %name, "hook already present, keeping user entry");
            continue;
        }
        let mut hook = hook.clone();
        hook.command = placeholders.substitute(&hook.command);
        let value = serde_json::to_value(&hook).map_err(|e| KitError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        additions.insert(name.clone(), value);
    }

    if additions.is_empty() {
        return Ok(document);
    }

    let mut patch = Map::new();
    patch.insert(HOOKS_KEY.to_string(), Value::Object(additions));
    Ok(SettingsDocument::from_map(merge_maps(
        document.into_map(),
        patch,
    )))
}
