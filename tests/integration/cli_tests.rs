//! CLI integration tests
//!
//! These tests run the cssvarcheck binary. The end-to-end checks need a
//! `git` executable and skip themselves when none is on PATH.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn cssvarcheck() -> Command {
    Command::cargo_bin("cssvarcheck").expect("binary should be built")
}

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(root: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args(args)
        .current_dir(root)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// A git repository with one stylesheet, tracked but not committed
fn repo_with_stylesheet(css: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    git(temp_dir.path(), &["init", "-q"]);
    std::fs::write(temp_dir.path().join("app.css"), css).unwrap();
    std::fs::write(
        temp_dir.path().join("colors.json5"),
        "{ options: { CSS: { prefix: 'foo' } }, colors: { a: '#000', b: '#fff' } }",
    )
    .unwrap();
    git(temp_dir.path(), &["add", "app.css", "colors.json5"]);
    temp_dir
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    cssvarcheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cssvarcheck"))
        .stdout(predicate::str::contains("--strict"))
        .stdout(predicate::str::contains("<TARGET>"));
}

#[test]
fn test_cli_version() {
    cssvarcheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cssvarcheck"));
}

#[test]
fn test_cli_requires_targets() {
    cssvarcheck().assert().failure();
}

// ============================================================================
// Failure Tests
// ============================================================================

#[test]
fn test_cli_missing_target_file() {
    cssvarcheck()
        .arg("does/not/exist.json5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does/not/exist.json5"));
}

#[test]
fn test_cli_missing_prefix() {
    cssvarcheck()
        .current_dir(fixtures_path())
        .arg("no_prefix.json5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("CSS prefix"));
}

#[test]
fn test_cli_unknown_format() {
    let target = fixtures_path().join("cros_colors.json5");

    cssvarcheck()
        .arg(&target)
        .args(["--format", "sarif"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown report format"));
}

// ============================================================================
// End-to-end Tests
// ============================================================================

#[test]
fn test_cli_reports_both_sections() {
    if !git_available() {
        println!("git not found, skipping");
        return;
    }

    let repo = repo_with_stylesheet(
        ".x { color: var(--foo-a); background: rgba(var(--foo-c-rgb), .5); }\n",
    );

    cssvarcheck()
        .current_dir(repo.path())
        .arg("colors.json5")
        .assert()
        .success()
        .stdout(
            "Has prefix --foo- but not in colors.json5:\n\
             --foo-c\n\
             \n\
             Generated by colors.json5 but not used in codebase:\n\
             --foo-b\n",
        );
}

#[test]
fn test_cli_strict_fails_on_findings() {
    if !git_available() {
        return;
    }

    let repo = repo_with_stylesheet(".x { color: var(--foo-a); }\n");

    cssvarcheck()
        .current_dir(repo.path())
        .args(["colors.json5", "--strict"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--foo-b"));
}

#[test]
fn test_cli_same_target_twice() {
    if !git_available() {
        return;
    }

    let repo = repo_with_stylesheet(".x { color: var(--foo-a); }\n");

    cssvarcheck()
        .current_dir(repo.path())
        .args(["colors.json5", "colors.json5"])
        .assert()
        .success()
        .stdout(
            "Has prefix --foo- but not in colors.json5:\n\
             \n\
             Generated by colors.json5 but not used in codebase:\n\
             --foo-b\n",
        );
}

#[test]
fn test_cli_strict_passes_when_clean() {
    if !git_available() {
        return;
    }

    let repo = repo_with_stylesheet(".x { color: var(--foo-a); border-color: var(--foo-b); }\n");

    cssvarcheck()
        .current_dir(repo.path())
        .args(["colors.json5", "--strict"])
        .assert()
        .success();
}

#[test]
fn test_cli_no_matches_is_not_an_error() {
    if !git_available() {
        return;
    }

    let repo = repo_with_stylesheet("body { margin: 0; }\n");

    cssvarcheck()
        .current_dir(repo.path())
        .arg("colors.json5")
        .assert()
        .success()
        .stdout(predicate::str::contains("--foo-a\n--foo-b\n"));
}

#[test]
fn test_cli_json_output_to_file() {
    if !git_available() {
        return;
    }

    let repo = repo_with_stylesheet(".x { color: var(--foo-a); }\n");
    let output = repo.path().join("report.json");

    cssvarcheck()
        .current_dir(repo.path())
        .args(["colors.json5", "--format", "json", "--output"])
        .arg(&output)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json[0]["css_prefix"], "--foo-");
    assert_eq!(json[0]["unused"], serde_json::json!(["--foo-b"]));
    assert_eq!(json[0]["unspecified"], serde_json::json!([]));
    assert_eq!(json[0]["files"], serde_json::json!(["colors.json5"]));
}

#[test]
fn test_cli_ignore_flag_and_root() {
    if !git_available() {
        return;
    }

    let repo = repo_with_stylesheet(".x { color: var(--foo-a); }\n");
    let target = repo.path().join("colors.json5");

    cssvarcheck()
        .arg("--root")
        .arg(repo.path())
        .arg(&target)
        .args(["--ignore", "^--foo-b$", "--strict"])
        .assert()
        .success();
}
