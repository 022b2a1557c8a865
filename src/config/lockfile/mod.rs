//! Lock file (`<primary>/.lock`) main module
//!
//! The lock file records every file agentkit installed together with the
//! SHA-256 checksum it had right after installation. Checksums are what lets
//! a reinstall skip files that are already correct.
//!
//! Two on-disk shapes exist:
//! - schema 1: group arrays hold bare path strings, `binary` is a bare string
//! - schema 2: every entry is `{ "path": ..., "checksum": ... }`
//!
//! Schema 1 files are migrated when read (see [`serialization`]); writes
//! always produce schema 2.

pub mod record;
pub mod serialization;
pub mod store;

#[cfg(test)]
mod tests;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub use record::{FileGroup, FileRecord};
pub use store::ManifestStore;

/// Schema version stamped on migrated legacy lock files
pub const LEGACY_SCHEMA_VERSION: u32 = 1;

/// Schema version produced by every write
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Installed files, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileGroups {
    #[serde(default)]
    pub agents: Vec<FileRecord>,
    #[serde(default)]
    pub commands: Vec<FileRecord>,
    #[serde(default)]
    pub templates: Vec<FileRecord>,
    #[serde(default)]
    pub rules: Vec<FileRecord>,
    #[serde(default)]
    pub output_styles: Vec<FileRecord>,
    /// Files matching none of the named groups
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<FileRecord>,
    #[serde(default)]
    pub binary: Option<FileRecord>,
}

impl FileGroups {
    /// Sort records into groups by their path
    ///
    /// Only one binary is tracked in `binary`; any further `/bin/` entries are
    /// kept in `other` so they are still removed on uninstall.
    pub fn categorize(records: impl IntoIterator<Item = FileRecord>) -> Self {
        let mut groups = Self::default();
        for record in records {
            match FileGroup::for_path(&record.path) {
                FileGroup::Agents => groups.agents.push(record),
                FileGroup::Commands => groups.commands.push(record),
                FileGroup::Templates => groups.templates.push(record),
                FileGroup::Rules => groups.rules.push(record),
                FileGroup::OutputStyles => groups.output_styles.push(record),
                FileGroup::Binary if groups.binary.is_none() => groups.binary = Some(record),
                FileGroup::Binary | FileGroup::Other => groups.other.push(record),
            }
        }
        groups
    }

    /// All records, in group order
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.agents
            .iter()
            .chain(&self.commands)
            .chain(&self.templates)
            .chain(&self.rules)
            .chain(&self.output_styles)
            .chain(&self.other)
            .chain(self.binary.iter())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Drop records whose path is empty
    pub(crate) fn retain_named(&mut self) {
        for group in [
            &mut self.agents,
            &mut self.commands,
            &mut self.templates,
            &mut self.rules,
            &mut self.output_styles,
            &mut self.other,
        ] {
            group.retain(|record| !record.path.is_empty());
        }
        if self.binary.as_ref().is_some_and(|record| record.path.is_empty()) {
            self.binary = None;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Lock file contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Version of the asset kit that was installed
    #[serde(rename = "version", default)]
    pub tool_version: String,
    /// RFC 3339 timestamp of the install
    #[serde(default)]
    pub installed_at: String,
    /// 1 for a migrated legacy file whose checksums are unknown, 2 otherwise
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub files: FileGroups,
}

fn current_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

impl Manifest {
    /// Build a fresh schema 2 manifest stamped with the current time
    pub fn new(records: impl IntoIterator<Item = FileRecord>, tool_version: &str) -> Self {
        Self {
            tool_version: tool_version.to_string(),
            installed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            schema_version: CURRENT_SCHEMA_VERSION,
            files: FileGroups::categorize(records),
        }
    }

    /// Whether this manifest came from a schema 1 file
    pub fn is_legacy(&self) -> bool {
        self.schema_version == LEGACY_SCHEMA_VERSION
    }

    /// Find the record for a path (forward-slash form)
    pub fn find(&self, path: &str) -> Option<&FileRecord> {
        self.files.iter().find(|record| record.path == path)
    }

    /// All recorded files
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.iter()
    }
}
