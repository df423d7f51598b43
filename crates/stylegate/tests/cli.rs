//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// Write `files` under a fresh project directory with a `.git` boundary.
fn project(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join(".git")).unwrap();
    for (name, contents) in files {
        let path = tmp.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    tmp
}

fn in_dir(dir: &Path) -> Command {
    let mut c = cmd();
    c.args(["--color", "never", "-C", dir.to_str().unwrap()]);
    c
}

const CLEAN: &str = "/**\n * Greet someone.\n *\n * @param  {String}  name  Who\n * @return {String} Greeting\n */\n";

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("check-style"))
        .stdout(predicate::str::contains("test-module"));
}

#[test]
fn long_help_lists_environment() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("STYLEGATE_TEST_GREP"))
        .stdout(predicate::str::contains("BROWSER"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn no_subcommand_shows_help() {
    // arg_required_else_help makes clap print help to stderr and exit 2
    cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// =============================================================================
// Scan Command
// =============================================================================

#[test]
fn scan_clean_file_passes() {
    let tmp = project(&[("lib/greet.js", CLEAN)]);
    in_dir(tmp.path())
        .args(["scan", "lib/greet.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK:"));
}

#[test]
fn scan_reports_violation_with_line() {
    let tmp = project(&[("lib/bad.js", "/**\n * @returns {String}\n */\n")]);
    in_dir(tmp.path())
        .args(["scan", "lib/bad.js"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("lib/bad.js"))
        .stdout(predicate::str::contains(
            "Use @return instead of @returns: 2:  * @returns {String}",
        ))
        .stderr(predicate::str::contains("style rule validation failed"));
}

#[test]
fn scan_reports_every_file_before_failing() {
    let tmp = project(&[
        ("a.js", " * @param x thing\n"),
        ("b.js", CLEAN),
        ("c.js", "\n\n * @throws  {Error}\n"),
    ]);
    in_dir(tmp.path())
        .args(["scan", "a.js", "b.js", "c.js"])
        .assert()
        .failure()
        .stdout(predicate::str::diff(
            "a.js: @param should be followed by 2 spaces: 1:  * @param x thing\n\
             c.js: @throws should be followed by 1 space: 3:  * @throws  {Error}\n",
        ))
        .stderr(predicate::str::contains("2 violation(s)"));
}

#[test]
fn scan_missing_file_fails() {
    let tmp = project(&[]);
    in_dir(tmp.path())
        .args(["scan", "missing.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn scan_json_lists_violations() {
    let tmp = project(&[("a.js", "x\n * @return  {x}\n")]);
    let output = in_dir(tmp.path())
        .args(["--json", "scan", "a.js"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["outcome"], "fail");
    assert_eq!(json["violations"][0]["file"], "a.js");
    assert_eq!(json["violations"][0]["line"], 2);
    assert_eq!(
        json["violations"][0]["message"],
        "@return should be followed by 1 space"
    );
}

#[test]
fn scan_uses_configured_files() {
    let tmp = project(&[
        (
            "stylegate.toml",
            "[style]\nfiles = [\"lib/**/*.js\", \"!lib/vendor/**\"]\n",
        ),
        ("lib/ok.js", CLEAN),
        ("lib/vendor/bad.js", " * @returns {x}\n"),
    ]);
    in_dir(tmp.path())
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 file(s)"));
}

#[test]
fn scan_all_occurrences_mode() {
    let tmp = project(&[("a.js", " * @returns {x}\n * @returns {y}\n")]);
    in_dir(tmp.path())
        .args(["scan", "--mode", "all-occurrences", "a.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 violation(s)"));
}

// =============================================================================
// Rules Command
// =============================================================================

#[test]
fn rules_lists_builtins() {
    cmd()
        .args(["--color", "never", "rules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("@param should be followed by 2 spaces"))
        .stdout(predicate::str::contains("Use @return instead of @returns"));
}

#[test]
fn rules_json_includes_custom_rule() {
    let tmp = project(&[(
        "stylegate.toml",
        "[[style.rules]]\npattern = '@see  '\nmessage = \"@see should be followed by 1 space\"\n",
    )]);
    let output = in_dir(tmp.path())
        .args(["rules", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rules: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rules = rules.as_array().unwrap();
    assert_eq!(rules.len(), 5);
    assert_eq!(rules[0]["pattern"], r"@param (\S|\s\s)");
    assert_eq!(rules[4]["builtin"], false);
}

// =============================================================================
// External Tools
// =============================================================================

#[cfg(unix)]
#[test]
fn test_forwards_runner_exit_code() {
    let tmp = project(&[(
        "stylegate.toml",
        "[test]\nprogram = \"sh\"\nargs = [\"-c\", \"exit 3\"]\nsetup = []\n",
    )]);
    in_dir(tmp.path())
        .arg("test")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("sh exited with exit code 3"));
}

#[cfg(unix)]
#[test]
fn check_style_runs_scan_after_failed_lint() {
    let tmp = project(&[
        (
            "stylegate.toml",
            "[lint]\nprogram = \"false\"\nfiles = [\"lib/*.js\"]\n\n[style]\nfiles = [\"lib/*.js\"]\n",
        ),
        ("lib/a.js", " * @returns {x}\n"),
    ]);
    in_dir(tmp.path())
        .arg("check-style")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Use @return instead of @returns: 1:"))
        .stderr(predicate::str::contains("false exited"))
        .stderr(predicate::str::contains("style rule validation failed"));
}

#[cfg(unix)]
#[test]
fn all_skips_tests_after_style_failure() {
    let tmp = project(&[
        (
            "stylegate.toml",
            "[lint]\nprogram = \"true\"\n\n[style]\nfiles = [\"*.js\"]\n\n[test]\nprogram = \"sh\"\nargs = [\"-c\", \"touch ran\"]\nsetup = []\n",
        ),
        ("a.js", " * @returns {x}\n"),
    ]);
    in_dir(tmp.path()).arg("default").assert().failure();
    assert!(!tmp.path().join("ran").exists());
}

#[cfg(unix)]
#[test]
fn test_module_rejects_path_names() {
    let tmp = project(&[]);
    in_dir(tmp.path())
        .args(["test-module", "../outside"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid module name"));
}

#[cfg(unix)]
#[test]
fn coverage_honors_test_grep_env() {
    let tmp = project(&[(
        "stylegate.toml",
        "[coverage]\nprogram = \"sh\"\nargs = [\"-c\", 'printf \"%s\\n\" \"$@\" > args.txt', \"cover\"]\n",
    )]);
    in_dir(tmp.path())
        .env("STYLEGATE_TEST_GREP", "login")
        .arg("coverage")
        .assert()
        .success();
    let recorded = fs::read_to_string(tmp.path().join("args.txt")).unwrap();
    let args: Vec<&str> = recorded.lines().collect();
    let wrapped = args.iter().position(|a| *a == "--").unwrap();
    assert!(args[wrapped..].windows(2).any(|w| w == ["--grep", "login"]));
}

#[test]
fn coverage_open_and_upload_conflict() {
    cmd()
        .args(["coverage", "--open", "--upload"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    cmd().args(["-q", "info"]).assert().success();
}

#[test]
fn multiple_verbose_flags_accepted() {
    cmd().args(["-vvv", "info"]).assert().success();
}

#[test]
fn color_always_accepted() {
    cmd().args(["--color", "always", "info"]).assert().success();
}

#[test]
fn info_json_outputs_valid_json() {
    let output = cmd().args(["info", "--json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "stylegate");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
