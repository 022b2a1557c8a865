//! CLI surface tests

mod common;

use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let workspace = common::TestWorkspace::new();

    common::agentkit_cmd_for_workspace(&workspace)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("uninstall"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_version_command() {
    let workspace = common::TestWorkspace::new();

    common::agentkit_cmd_for_workspace(&workspace)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "agentkit {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_completions_bash() {
    let workspace = common::TestWorkspace::new();

    common::agentkit_cmd_for_workspace(&workspace)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("agentkit"));
}

#[test]
fn test_completions_unknown_shell() {
    let workspace = common::TestWorkspace::new();

    common::agentkit_cmd_for_workspace(&workspace)
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown shell"));
}

#[test]
fn test_only_flags_conflict() {
    let workspace = common::TestWorkspace::new();

    common::agentkit_cmd_for_workspace(&workspace)
        .args(["install", "--primary-only", "--secondary-only"])
        .assert()
        .failure();
}

#[test]
fn test_options_from_environment() {
    let workspace = common::TestWorkspace::new();
    workspace.kit_primary("agents/a.md", "a");
    std::fs::rename(workspace.kit_dir(), workspace.path.join("elsewhere")).unwrap();

    common::agentkit_cmd_for_workspace(&workspace)
        .env("AGENTKIT_ASSETS_DIR", workspace.path.join("elsewhere"))
        .env("AGENTKIT_PRIMARY_DIR", workspace.path.join("custom"))
        .arg("install")
        .assert()
        .success();

    assert!(workspace.file_exists("custom/agents/a.md"));
    assert!(workspace.file_exists("custom/.lock"));
}
