//! Integration tests for the askdoc CLI
//!
//! These exercise the argument surface and the fail-fast paths that need
//! neither a running runtime nor any model on disk.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn askdoc_cmd() -> Command {
    let mut cmd = Command::cargo_bin("askdoc").unwrap();
    // Keep tests hermetic: never reach for a real runtime binary
    cmd.env("ASKDOC_RUNTIME_BIN", "/nonexistent/askdoc-test-runtime");
    cmd.env("ASKDOC_RUNTIME_URL", "http://127.0.0.1:9");
    cmd
}

#[test]
fn test_help_describes_commands() {
    askdoc_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("setup"));
}

#[test]
fn test_run_with_empty_docs_dir_exits_before_runtime_work() {
    let docs = TempDir::new().unwrap();

    askdoc_cmd()
        .arg("run")
        .arg("--docs")
        .arg(docs.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("No documents found"));
}

#[test]
fn test_run_with_missing_docs_dir_fails() {
    askdoc_cmd()
        .arg("run")
        .arg("--docs")
        .arg("/nonexistent/askdoc-docs")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("No documents found"));
}

#[test]
fn test_setup_with_unresolvable_runtime_binary_fails_acquisition() {
    askdoc_cmd()
        .arg("setup")
        .arg("--model")
        .arg("no-such-model")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("acquisition failed"));
}
