//! Lock file entries

use serde::{Deserialize, Deserializer, Serialize};

/// One installed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Absolute destination path, forward slashes
    pub path: String,
    /// Lowercase hex SHA-256, absent for entries migrated from schema 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, checksum: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            checksum: Some(checksum.into()),
        }
    }

    /// An entry whose content was never verified
    pub fn unverified(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            checksum: None,
        }
    }
}

/// A record is either `{path, checksum}` or, for lock files written by older
/// releases, a bare path string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecord {
    Bare(String),
    Full {
        path: String,
        #[serde(default)]
        checksum: Option<String>,
    },
}

impl<'de> Deserialize<'de> for FileRecord {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawRecord::deserialize(deserializer)? {
            RawRecord::Bare(path) => FileRecord::unverified(path),
            RawRecord::Full { path, checksum } => FileRecord { path, checksum },
        })
    }
}

/// Group a path belongs to in the lock file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileGroup {
    Agents,
    Commands,
    Templates,
    Rules,
    OutputStyles,
    Binary,
    Other,
}

impl FileGroup {
    /// Path fragments checked in order; the first match decides the group
    const MARKERS: &'static [(&'static str, FileGroup)] = &[
        ("/agents/", FileGroup::Agents),
        ("/commands/", FileGroup::Commands),
        ("/templates/", FileGroup::Templates),
        ("/rules/", FileGroup::Rules),
        ("/outputStyles/", FileGroup::OutputStyles),
        ("/bin/", FileGroup::Binary),
    ];

    /// Classify a forward-slash path by substring
    pub fn for_path(path: &str) -> Self {
        Self::MARKERS
            .iter()
            .find(|(marker, _)| path.contains(marker))
            .map_or(FileGroup::Other, |(_, group)| *group)
    }
}
