//! Configuration integration tests.
//!
//! These tests verify config discovery, format parsing, and precedence
//! from an end-to-end perspective using the compiled binary. Tests use
//! `info --json` to assert actual config values, not just process success.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// Run `info --json` from a directory and parse the JSON output.
fn info_json(dir: &std::path::Path) -> Value {
    info_json_with(dir, &[])
}

fn info_json_with(dir: &std::path::Path, extra: &[&str]) -> Value {
    let output = cmd()
        .args(["-C", dir.to_str().unwrap()])
        .args(extra)
        .args(["info", "--json"])
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

// =============================================================================
// Config File Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "info");
    assert!(json["config"]["config_file"].is_null());
    assert_eq!(json["config"]["test_timeout_ms"], 60_000);
    assert_eq!(json["config"]["scan_mode"], "first-match");
    assert_eq!(json["config"]["lint_program"], "node_modules/.bin/jshint");
}

#[test]
fn discovers_dotfile_config_in_current_dir() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".stylegate.toml"), r#"log_level = "debug""#).unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "debug");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(
        reported.ends_with(".stylegate.toml"),
        "should report dotfile: {reported}"
    );
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("nested").join("deep");
    fs::create_dir_all(&sub_dir).unwrap();
    fs::write(tmp.path().join("stylegate.toml"), "[test]\ntimeout_ms = 120000\n").unwrap();

    let json = info_json(&sub_dir);

    assert_eq!(json["config"]["test_timeout_ms"], 120_000);
    let root = json["config"]["project_root"].as_str().unwrap();
    assert!(
        !root.ends_with("deep"),
        "project root should be the config's directory: {root}"
    );
}

#[test]
fn regular_name_overrides_dotfile() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".stylegate.toml"), r#"log_level = "debug""#).unwrap();
    fs::write(tmp.path().join("stylegate.toml"), r#"log_level = "error""#).unwrap();

    let json = info_json(tmp.path());

    assert_eq!(
        json["config"]["log_level"], "error",
        "regular file should override dotfile"
    );
}

// =============================================================================
// Config Format Parsing
// =============================================================================

#[test]
fn parses_toml_style_section() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("stylegate.toml"),
        "[style]\nfiles = [\"src/**/*.js\"]\nmode = \"all-occurrences\"\n\n[[style.rules]]\npattern = '@see  '\nmessage = \"@see should be followed by 1 space\"\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["style_files"][0], "src/**/*.js");
    assert_eq!(json["config"]["scan_mode"], "all-occurrences");
    assert_eq!(json["config"]["custom_rules"], 1);
}

#[test]
fn parses_yaml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("stylegate.yaml"),
        "lint:\n  program: eslint\ncoverage:\n  output_dir: build/coverage\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["lint_program"], "eslint");
    assert_eq!(json["config"]["coverage_dir"], "build/coverage");
}

#[test]
fn parses_json_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("stylegate.json"),
        r#"{"test": {"program": "node_modules/.bin/jest", "grep": "api"}}"#,
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["test_program"], "node_modules/.bin/jest");
    assert_eq!(json["config"]["test_grep"], "api");
}

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("stylegate.toml"), r#"log_level = "debug""#).unwrap();
    let explicit = tmp.path().join("ci.toml");
    fs::write(&explicit, r#"log_level = "warn""#).unwrap();

    let json = info_json_with(tmp.path(), &["--config", explicit.to_str().unwrap()]);

    assert_eq!(json["config"]["log_level"], "warn");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with("ci.toml"), "should report explicit file: {reported}");
}

#[test]
fn env_var_overrides_config_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("stylegate.toml"), "[test]\ntimeout_ms = 120000\n").unwrap();

    let output = cmd()
        .env("STYLEGATE_TEST__TIMEOUT_MS", "5000")
        .args(["-C", tmp.path().to_str().unwrap(), "info", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["test_timeout_ms"], 5000);
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".stylegate.toml"),
        "this is not valid toml [[[",
    )
    .unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration").or(predicate::str::contains("config")));
}

#[test]
fn invalid_scan_mode_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("stylegate.toml"), "[style]\nmode = \"sometimes\"\n").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure();
}

#[test]
fn invalid_custom_rule_fails_scan() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("stylegate.toml"),
        "[[style.rules]]\npattern = '('\nmessage = \"broken\"\n",
    )
    .unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "scan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid style rule pattern"));
}

#[test]
fn unknown_config_field_is_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".stylegate.toml"),
        "log_level = \"info\"\nunknown_field = \"should be ignored\"\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "info");
}

// =============================================================================
// Boundary Marker Tests
// =============================================================================

#[test]
fn git_boundary_stops_config_search() {
    let tmp = TempDir::new().unwrap();
    let parent = tmp.path().join("parent");
    let repo = parent.join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(parent.join(".stylegate.toml"), r#"log_level = "error""#).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();

    let json = info_json(&src);

    assert_eq!(json["config"]["log_level"], "info");
    assert!(json["config"]["config_file"].is_null());
}

#[test]
fn config_in_same_dir_as_git_is_found() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(repo.join(".stylegate.toml"), r#"log_level = "debug""#).unwrap();

    let json = info_json(&src);

    assert_eq!(json["config"]["log_level"], "debug");
}
