// domain-hunt/tests/cli_integration.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command isolated from the user's config files and DH_* environment.
fn isolated_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("domain-hunt").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env_remove("RUST_LOG");
    for key in [
        "DH_CONCURRENCY",
        "DH_MAX_LENGTH",
        "DH_TLD",
        "DH_OUTPUT",
        "DH_CHECKPOINT",
        "DH_RDAP_URL",
        "DH_DICTIONARY",
        "DH_TIMEOUT",
        "DH_COOLDOWN",
        "DH_DELAY",
    ] {
        cmd.env_remove(key);
    }
    cmd.timeout(std::time::Duration::from_secs(30));
    cmd
}

#[test]
fn test_help_lists_scan_flags() {
    let mut cmd = Command::cargo_bin("domain-hunt").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--dictionary"))
        .stdout(predicate::str::contains("--concurrency"))
        .stdout(predicate::str::contains("--checkpoint"))
        .stdout(predicate::str::contains("--cooldown"))
        .stdout(predicate::str::contains("--fresh"));
}

#[test]
fn test_invalid_concurrency_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = isolated_cmd(&dir);
    cmd.args(["--concurrency", "0", "--dictionary", "words.txt"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Concurrency must be between 1 and 100"));
}

#[test]
fn test_invalid_duration_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = isolated_cmd(&dir);
    cmd.args(["--timeout", "eventually"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid duration"));
}

#[test]
fn test_oversized_timeout_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("words.txt"), "abc\n").unwrap();

    let mut cmd = isolated_cmd(&dir);
    cmd.args([
        "--dictionary",
        "words.txt",
        "--timeout",
        "18446744073709551615",
    ]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("Request timeout"));
}

#[test]
fn test_overflowing_cooldown_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = isolated_cmd(&dir);
    cmd.args(["--cooldown", "307445734561825861m"]);

    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid duration"));
}

#[test]
fn test_missing_dictionary_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = isolated_cmd(&dir);
    cmd.args(["--dictionary", "does-not-exist.txt"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to fetch dictionary"));

    // Nothing was probed, so no checkpoint exists
    assert!(!dir.path().join("checkpoint.txt").exists());
}

#[test]
fn test_dictionary_with_no_usable_words_completes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("words.txt"),
        "much-too-long-for-a-label\nnot valid\nhy-phen\n",
    )
    .unwrap();

    let mut cmd = isolated_cmd(&dir);
    cmd.args(["--dictionary", "words.txt", "--output", "found.txt"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0 candidates"))
        .stdout(predicate::str::contains("Scan complete."));

    // The output file is opened for appending even when nothing matches
    assert_eq!(fs::read_to_string(dir.path().join("found.txt")).unwrap(), "");
}

#[test]
fn test_json_summary_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("words.txt"), "").unwrap();

    let mut cmd = isolated_cmd(&dir);
    cmd.args(["--dictionary", "words.txt", "--json"]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["outcome"], "completed");
    assert_eq!(summary["processed"], 0);
    assert_eq!(summary["matches"].as_array().map(|m| m.len()), Some(0));
}

#[test]
fn test_config_file_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("words.txt"), "").unwrap();
    fs::write(
        dir.path().join("domain-hunt.toml"),
        "[scan]\noutput = \"from-config.txt\"\n",
    )
    .unwrap();

    let mut cmd = isolated_cmd(&dir);
    cmd.args(["--dictionary", "words.txt"]);
    cmd.assert().success();

    assert!(dir.path().join("from-config.txt").exists());
    assert!(!dir.path().join("rdap_available.txt").exists());
}

#[test]
fn test_invalid_explicit_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.toml"), "[scan]\nconcurrency = 500\n").unwrap();

    let mut cmd = isolated_cmd(&dir);
    cmd.args(["--config", "bad.toml", "--dictionary", "words.txt"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_fresh_removes_stale_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("words.txt"), "").unwrap();
    fs::write(dir.path().join("checkpoint.txt"), "zebra").unwrap();

    let mut cmd = isolated_cmd(&dir);
    cmd.args(["--dictionary", "words.txt", "--fresh"]);
    cmd.assert().success();

    assert!(!dir.path().join("checkpoint.txt").exists());
}
