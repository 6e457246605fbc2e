//! Smoke tests for the tackle-e2e CLI
//!
//! Runs use the in-process fake application, so no browser or Tackle
//! instance is needed.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the tackle-e2e binary with a clean environment
fn tackle() -> Command {
    let mut cmd = Command::cargo_bin("tackle-e2e").expect("tackle-e2e binary should exist");
    for var in [
        "TACKLE_URL",
        "TACKLE_USER",
        "TACKLE_PASS",
        "TACKLE_NEW_PASS",
        "TACKLE_GREP_TAGS",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    tackle()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.3.0"));
}

#[test]
fn test_help_flag() {
    tackle()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_shows_help() {
    tackle().assert().failure();
}

#[test]
fn test_run_subcommand_help() {
    tackle()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--suite"))
        .stdout(predicate::str::contains("--driver"))
        .stdout(predicate::str::contains("--fail-fast"));
}

// ============================================================================
// List
// ============================================================================

#[test]
fn test_list_shows_suites_and_tests() {
    tackle()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("business-services-pagination [@tier3]"))
        .stdout(predicate::str::contains("application-inventory-filters [@tier2]"))
        .stdout(predicate::str::contains("  - rank sort"));
}

#[test]
fn test_list_json() {
    let output = tackle().args(["list", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let catalog: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = catalog
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"tag-types-sort"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_redacts_password() {
    tackle()
        .arg("config")
        .env("TACKLE_PASS", "hunter2")
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url"))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_config_file_and_url_flag() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tackle.yaml");
    fs::write(
        &path,
        "base_url: https://from-file.example.com\nusername: qe\ngrep_tags: ['@tier1']\n",
    )
    .unwrap();

    tackle()
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("https://from-file.example.com"))
        .stdout(predicate::str::contains("qe"))
        .stdout(predicate::str::contains("@tier1"));

    tackle()
        .args(["config", "--url", "https://from-flag.example.com", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("https://from-flag.example.com"));
}

#[test]
fn test_config_rejects_bad_url() {
    tackle()
        .args(["config", "--url", "ftp://tackle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_config_missing_file_fails() {
    tackle()
        .args(["config", "--config", "/nonexistent/tackle.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

// ============================================================================
// Run against the fake application
// ============================================================================

#[test]
fn test_run_fake_single_suite() {
    tackle()
        .args(["run", "--driver", "fake", "--suite", "tag-types-sort"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS tag-types-sort > rank sort"))
        .stdout(predicate::str::contains("3 passed, 0 failed, 0 skipped"));
}

#[test]
fn test_run_fake_json_report() {
    let output = tackle()
        .args(["run", "--driver", "fake", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["failed"], 0);
    assert_eq!(report["suites"].as_array().unwrap().len(), 3);
}

#[test]
fn test_run_fake_tag_filter_skips_other_suites() {
    tackle()
        .args(["run", "--driver", "fake", "--tags", "@tier2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS application-inventory-filters"))
        .stdout(predicate::str::contains("SKIP tag-types-sort (not selected)"));
}

#[test]
fn test_run_unknown_suite_fails() {
    tackle()
        .args(["run", "--driver", "fake", "--suite", "no-such-suite"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown suite"));
}

#[test]
fn test_run_quiet_prints_only_summary() {
    tackle()
        .args(["run", "-q", "--driver", "fake", "--suite", "tag-types-sort"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS").not())
        .stdout(predicate::str::contains("3 passed"));
}
