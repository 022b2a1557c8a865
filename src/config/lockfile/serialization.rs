//! Lock file parsing with schema detection
//!
//! Detection looks at the parsed JSON before committing to a shape:
//!
//! 1. `schemaVersion == 2` present => schema 2
//! 2. `files.agents` absent or empty => schema 2
//! 3. first `files.agents` entry is a bare string => schema 1, otherwise schema 2
//!
//! Step 2 cannot tell an empty schema 2 file from a schema 1 file that simply
//! had no agents. Such a file is read as schema 2; bare strings in its other
//! groups still parse (as unverified records), so they get reinstalled.

use serde::Deserialize;
use serde_json::Value;

use super::{FileGroups, FileRecord, LEGACY_SCHEMA_VERSION, Manifest};

/// Which schema a lock file document uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Legacy,
    Current,
}

/// Schema 1 lock file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyManifest {
    #[serde(default)]
    version: String,
    #[serde(default)]
    installed_at: String,
    #[serde(default)]
    files: LegacyFiles,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyFiles {
    #[serde(default)]
    agents: Vec<String>,
    #[serde(default)]
    commands: Vec<String>,
    #[serde(default)]
    templates: Vec<String>,
    #[serde(default)]
    rules: Vec<String>,
    #[serde(default)]
    output_styles: Vec<String>,
    #[serde(default)]
    binary: Option<String>,
}

impl From<LegacyManifest> for Manifest {
    fn from(legacy: LegacyManifest) -> Self {
        let unverified =
            |paths: Vec<String>| paths.into_iter().map(FileRecord::unverified).collect();
        let files = legacy.files;

        Manifest {
            tool_version: legacy.version,
            installed_at: legacy.installed_at,
            schema_version: LEGACY_SCHEMA_VERSION,
            files: FileGroups {
                agents: unverified(files.agents),
                commands: unverified(files.commands),
                templates: unverified(files.templates),
                rules: unverified(files.rules),
                output_styles: unverified(files.output_styles),
                other: Vec::new(),
                binary: files.binary.map(FileRecord::unverified),
            },
        }
    }
}

/// Decide which schema a parsed lock file uses
pub fn detect_schema(document: &Value) -> SchemaKind {
    if document.get("schemaVersion").and_then(Value::as_u64) == Some(2) {
        return SchemaKind::Current;
    }

    let first_agent = document
        .pointer("/files/agents")
        .and_then(Value::as_array)
        .and_then(|agents| agents.first());

    match first_agent {
        Some(Value::String(_)) => SchemaKind::Legacy,
        _ => SchemaKind::Current,
    }
}

/// Parse lock file JSON, migrating schema 1 documents in memory
///
/// Migrated manifests keep `schema_version == 1` and carry no checksums until
/// the next write. Records with an empty path (schema 1 wrote `"binary": ""`
/// when no binary was installed) are dropped.
pub fn parse_manifest(json: &str) -> std::result::Result<Manifest, serde_json::Error> {
    let document: Value = serde_json::from_str(json)?;

    let mut manifest = match detect_schema(&document) {
        SchemaKind::Legacy => serde_json::from_value::<LegacyManifest>(document)?.into(),
        SchemaKind::Current => {
            let mut manifest: Manifest = serde_json::from_value(document)?;
            manifest.schema_version = super::CURRENT_SCHEMA_VERSION;
            manifest
        }
    };
    manifest.files.retain_named();
    Ok(manifest)
}

/// Render a manifest as pretty JSON with a trailing newline
pub fn render_manifest(manifest: &Manifest) -> std::result::Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    Ok(json)
}
