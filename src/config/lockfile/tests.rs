//! Tests for lock file module

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::serialization::{SchemaKind, detect_schema, parse_manifest, render_manifest};
use super::*;
use crate::common::OsFileSystem;
use crate::error::KitError;
use crate::hash::{checksum_bytes, is_valid_checksum};
use crate::path_utils::to_forward_slashes;

const LEGACY_LOCK: &str = r#"{
  "version": "1.4.0",
  "installedAt": "2024-05-01T10:00:00.000Z",
  "files": {
    "agents": ["a.md", "b.md"],
    "commands": [],
    "templates": [],
    "rules": [],
    "outputStyles": [],
    "binary": ""
  }
}"#;

fn write_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn record_for(path: &Path) -> FileRecord {
    FileRecord::new(
        to_forward_slashes(path),
        checksum_bytes(&fs::read(path).unwrap()),
    )
}

#[test]
fn test_categorize_by_path_fragment() {
    let groups = FileGroups::categorize([
        FileRecord::new("/p/agents/a.md", "1"),
        FileRecord::new("/p/commands/c.md", "2"),
        FileRecord::new("/s/templates/t.md", "3"),
        FileRecord::new("/p/rules/r.md", "4"),
        FileRecord::new("/p/outputStyles/o.md", "5"),
        FileRecord::new("/s/bin/tool", "6"),
        FileRecord::new("/s/README.md", "7"),
    ]);

    assert_eq!(groups.agents.len(), 1);
    assert_eq!(groups.commands.len(), 1);
    assert_eq!(groups.templates.len(), 1);
    assert_eq!(groups.rules.len(), 1);
    assert_eq!(groups.output_styles.len(), 1);
    assert_eq!(groups.binary.as_ref().unwrap().path, "/s/bin/tool");
    assert_eq!(groups.other[0].path, "/s/README.md");
    assert_eq!(groups.len(), 7);
}

#[test]
fn test_second_binary_lands_in_other() {
    let groups = FileGroups::categorize([
        FileRecord::new("/s/bin/one", "1"),
        FileRecord::new("/s/bin/two", "2"),
    ]);
    assert_eq!(groups.binary.unwrap().path, "/s/bin/one");
    assert_eq!(groups.other[0].path, "/s/bin/two");
}

#[test]
fn test_detect_schema_heuristic() {
    let explicit: serde_json::Value =
        serde_json::from_str(r#"{"schemaVersion": 2, "files": {"agents": ["x"]}}"#).unwrap();
    let empty: serde_json::Value =
        serde_json::from_str(r#"{"files": {"agents": [], "commands": ["c"]}}"#).unwrap();
    let missing: serde_json::Value = serde_json::from_str(r#"{"version": "1"}"#).unwrap();
    let legacy: serde_json::Value = serde_json::from_str(LEGACY_LOCK).unwrap();
    let records: serde_json::Value =
        serde_json::from_str(r#"{"files": {"agents": [{"path": "a"}]}}"#).unwrap();

    assert_eq!(detect_schema(&explicit), SchemaKind::Current);
    assert_eq!(detect_schema(&empty), SchemaKind::Current);
    assert_eq!(detect_schema(&missing), SchemaKind::Current);
    assert_eq!(detect_schema(&legacy), SchemaKind::Legacy);
    assert_eq!(detect_schema(&records), SchemaKind::Current);
}

#[test]
fn test_parse_legacy_migrates_without_checksums() {
    let manifest = parse_manifest(LEGACY_LOCK).unwrap();

    assert_eq!(manifest.schema_version, LEGACY_SCHEMA_VERSION);
    assert!(manifest.is_legacy());
    assert_eq!(manifest.tool_version, "1.4.0");
    assert_eq!(
        manifest.files.agents,
        vec![FileRecord::unverified("a.md"), FileRecord::unverified("b.md")]
    );
    assert!(manifest.files.binary.is_none());
}

#[test]
fn test_parse_legacy_binary_string() {
    let json = r#"{"version": "1", "installedAt": "", "files": {"agents": ["a"], "binary": "/s/bin/tool"}}"#;
    let manifest = parse_manifest(json).unwrap();
    assert_eq!(
        manifest.files.binary,
        Some(FileRecord::unverified("/s/bin/tool"))
    );
}

#[test]
fn test_empty_agents_reads_bare_strings_as_unverified() {
    let json = r#"{"version": "1", "files": {"agents": [], "rules": ["/p/rules/r.md"]}}"#;
    let manifest = parse_manifest(json).unwrap();

    assert_eq!(manifest.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(manifest.files.rules, vec![FileRecord::unverified("/p/rules/r.md")]);
}

#[test]
fn test_empty_binary_is_dropped_under_either_schema() {
    let with_agents = r#"{"version": "1", "files": {"agents": ["/p/agents/a.md"], "binary": ""}}"#;
    let without_agents = r#"{"version": "1", "files": {"agents": [], "commands": [""], "binary": ""}}"#;

    for json in [with_agents, without_agents] {
        let manifest = parse_manifest(json).unwrap();
        assert_eq!(manifest.files.binary, None, "{json}");
        assert!(manifest.records().all(|record| !record.path.is_empty()), "{json}");
    }
    assert!(parse_manifest(without_agents).unwrap().files.is_empty());
}

#[test]
fn test_render_current_schema_shape() {
    let manifest = Manifest::new([FileRecord::new("/p/outputStyles/o.md", "ab")], "2.0.0");
    let json = render_manifest(&manifest).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["schemaVersion"], 2);
    assert_eq!(value["version"], "2.0.0");
    assert_eq!(value["files"]["outputStyles"][0]["checksum"], "ab");
    assert!(value["files"].get("other").is_none());
    assert!(value["files"]["binary"].is_null());
    assert!(value["installedAt"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_read_missing_lock_file_is_none() {
    let temp = TempDir::new().unwrap();
    let store = ManifestStore::new(&OsFileSystem, temp.path().join(".lock"));
    assert!(store.read().unwrap().is_none());
}

#[test]
fn test_read_malformed_lock_file_fails() {
    let temp = TempDir::new().unwrap();
    let path = write_file(temp.path(), ".lock", "{ not json");
    let store = ManifestStore::new(&OsFileSystem, &path);

    let err = store.read().unwrap_err();
    assert!(matches!(err, KitError::ManifestParseFailed { .. }));
}

#[test]
fn test_legacy_round_trip_gains_checksums() {
    let temp = TempDir::new().unwrap();
    let a = write_file(temp.path(), "p/agents/a.md", "agent a");
    let b = write_file(temp.path(), "p/agents/b.md", "agent b");
    let lock_path = temp.path().join("p/.lock");
    let legacy = LEGACY_LOCK
        .replace("\"a.md\"", &format!("\"{}\"", to_forward_slashes(&a)))
        .replace("\"b.md\"", &format!("\"{}\"", to_forward_slashes(&b)));
    fs::write(&lock_path, legacy).unwrap();
    let store = ManifestStore::new(&OsFileSystem, &lock_path);

    let before = store.read().unwrap().unwrap();
    assert_eq!(before.schema_version, 1);
    assert!(before.records().all(|r| r.checksum.is_none()));

    let records = vec![record_for(&a), record_for(&b)];
    store.write(&records, "1.5.0").unwrap();

    let after = store.read().unwrap().unwrap();
    assert_eq!(after.schema_version, 2);
    assert_eq!(after.files.agents.len(), 2);
    assert!(
        after
            .records()
            .all(|r| r.checksum.as_deref().is_some_and(is_valid_checksum))
    );
}

#[test]
fn test_needing_reinstall_without_lock_file_returns_all() {
    let temp = TempDir::new().unwrap();
    let a = write_file(temp.path(), "p/agents/a.md", "a");
    let missing = temp.path().join("p/agents/missing.md");
    let store = ManifestStore::new(&OsFileSystem, temp.path().join("p/.lock"));

    let stale = store.files_needing_reinstall(&[a.clone(), missing]).unwrap();

    assert_eq!(stale.len(), 2);
    assert_eq!(stale[0].checksum.as_deref(), Some(checksum_bytes(b"a").as_str()));
    assert!(stale[1].checksum.is_none());
}

#[test]
fn test_needing_reinstall_detects_edit_new_and_legacy() {
    let temp = TempDir::new().unwrap();
    let unchanged = write_file(temp.path(), "p/agents/same.md", "same");
    let edited = write_file(temp.path(), "p/commands/edit.md", "original");
    let legacy = write_file(temp.path(), "p/rules/old.md", "old");
    let fresh = write_file(temp.path(), "p/rules/new.md", "new");
    let store = ManifestStore::new(&OsFileSystem, temp.path().join("p/.lock"));

    let mut records = vec![record_for(&unchanged), record_for(&edited)];
    records.push(FileRecord::unverified(to_forward_slashes(&legacy)));
    store.write(&records, "1.0.0").unwrap();
    fs::write(&edited, "user edit").unwrap();

    let stale = store
        .files_needing_reinstall(&[unchanged, edited.clone(), legacy.clone(), fresh.clone()])
        .unwrap();
    let stale_paths: Vec<String> = stale.into_iter().map(|r| r.path).collect();

    assert_eq!(
        stale_paths,
        vec![
            to_forward_slashes(&edited),
            to_forward_slashes(&legacy),
            to_forward_slashes(&fresh)
        ]
    );
}

#[test]
fn test_needing_reinstall_deleted_file_is_stale() {
    let temp = TempDir::new().unwrap();
    let file = write_file(temp.path(), "p/agents/gone.md", "x");
    let store = ManifestStore::new(&OsFileSystem, temp.path().join("p/.lock"));
    store.write(&[record_for(&file)], "1.0.0").unwrap();
    fs::remove_file(&file).unwrap();

    let stale = store.files_needing_reinstall(&[file]).unwrap();
    assert_eq!(stale.len(), 1);
    assert!(stale[0].checksum.is_none());
}

#[test]
fn test_remove_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let store = ManifestStore::new(&OsFileSystem, temp.path().join(".lock"));
    store.write(&[], "1.0.0").unwrap();
    store.remove().unwrap();
    store.remove().unwrap();
    assert!(store.read().unwrap().is_none());
}
