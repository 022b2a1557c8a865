//! Common test utilities for agentkit integration tests

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A kit plus a fake home directory, all inside one temp dir
///
/// ```text
/// <temp>/kit/kit.yaml
/// <temp>/kit/primary/...
/// <temp>/kit/secondary/...
/// <temp>/home/.claude       primary target
/// <temp>/home/.agentkit     secondary target
/// ```
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace with a minimal `kit.yaml`
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let workspace = Self { temp, path };
        workspace.write_file("kit/kit.yaml", "name: test-kit\nversion: 2.1.0\n");
        workspace
    }

    pub fn kit_dir(&self) -> PathBuf {
        self.path.join("kit")
    }

    pub fn home(&self) -> PathBuf {
        self.path.join("home")
    }

    pub fn primary_dir(&self) -> PathBuf {
        self.home().join(".claude")
    }

    pub fn secondary_dir(&self) -> PathBuf {
        self.home().join(".agentkit")
    }

    pub fn lock_file(&self) -> PathBuf {
        self.primary_dir().join(".lock")
    }

    /// Add a kit file installed under the primary root
    pub fn kit_primary(&self, relative: &str, content: &str) {
        self.write_file(&format!("kit/primary/{relative}"), content);
    }

    /// Add a kit file installed under the secondary root
    pub fn kit_secondary(&self, relative: &str, content: &str) {
        self.write_file(&format!("kit/secondary/{relative}"), content);
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Parsed lock file
    pub fn lock_json(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(self.lock_file()).expect("Failed to read lock file");
        serde_json::from_str(&text).expect("Lock file is not JSON")
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// agentkit command pointed at the workspace's kit and fake home
///
/// Developer overrides in the environment are cleared so tests never touch a
/// real configuration directory.
#[allow(deprecated)]
pub fn agentkit_cmd_for_workspace(workspace: &TestWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("agentkit").unwrap();
    for var in [
        "AGENTKIT_PRIMARY_DIR",
        "AGENTKIT_SECONDARY_DIR",
        "AGENTKIT_ASSETS_DIR",
        "AGENTKIT_LOCKFILE",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.current_dir(&workspace.path)
        .env("HOME", workspace.home())
        .env("AGENTKIT_PRIMARY_DIR", workspace.primary_dir())
        .env("AGENTKIT_SECONDARY_DIR", workspace.secondary_dir());
    cmd
}

/// Forward-slash form of a path, as stored in the lock file
#[allow(dead_code)]
pub fn lock_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creation() {
        let workspace = TestWorkspace::new();
        assert!(workspace.file_exists("kit/kit.yaml"));
        assert!(!workspace.primary_dir().exists());
    }

    #[test]
    fn test_workspace_kit_files() {
        let workspace = TestWorkspace::new();
        workspace.kit_primary("agents/a.md", "hello");
        assert_eq!(workspace.read_file("kit/primary/agents/a.md"), "hello");
    }
}
