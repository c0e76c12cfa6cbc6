//! CLI end-to-end tests
//!
//! Runs the piratarr binary for the commands that do not start the server.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const SAMPLE_SRT: &str = "1\n00:00:01,000 --> 00:00:04,000\nHello my friend.\n\n\
                          2\n00:00:05,000 --> 00:00:07,250\nWhere is the money?\n";

/// Get a command for the piratarr binary
#[allow(deprecated)]
fn piratarr_cmd() -> Command {
    Command::cargo_bin("piratarr").unwrap()
}

// ---- help and version ----

#[test]
fn test_cli_no_args_shows_help() {
    piratarr_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    piratarr_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("piratarr"))
        .stdout(predicate::str::contains("translate"));
}

#[test]
fn test_cli_version_command() {
    piratarr_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("piratarr "));
}

// ---- preview ----

#[test]
fn test_cli_preview_seeded() {
    let first = piratarr_cmd()
        .args(["preview", "Hello friend.", "--seed", "42"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Ahoy matey."))
        .get_output()
        .stdout
        .clone();

    let second = piratarr_cmd()
        .args(["preview", "Hello friend.", "--seed", "42"])
        .output()
        .unwrap()
        .stdout;
    assert_eq!(first, second);
}

// ---- translate ----

#[test]
fn test_cli_translate_writes_pirate_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("Hook.en.srt");
    fs::write(&input, SAMPLE_SRT).unwrap();
    let expected = dir.path().join("Hook.pirate.en.srt");

    piratarr_cmd()
        .arg("translate")
        .arg(&input)
        .args(["--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hook.pirate.en.srt"));

    let written = fs::read_to_string(&expected).unwrap();
    assert!(written.contains("Ahoy me hearty."));
    assert!(written.contains("00:00:05,000 --> 00:00:07,250"));
}

#[test]
fn test_cli_translate_explicit_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.srt");
    let output = dir.path().join("out/arr.srt");
    fs::write(&input, SAMPLE_SRT).unwrap();
    fs::create_dir_all(output.parent().unwrap()).unwrap();

    piratarr_cmd()
        .arg("translate")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    assert!(output.exists());
    assert!(!dir.path().join("in.pirate.srt").exists());
}

#[test]
fn test_cli_translate_missing_input_fails() {
    piratarr_cmd()
        .args(["translate", "/nonexistent/file.srt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

// ---- validate ----

#[test]
fn test_cli_validate_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("piratarr.toml");
    fs::write(
        &config,
        "[server]\nport = 7000\n\n[storage]\ndata_dir = \"/srv/piratarr\"\n",
    )
    .unwrap();

    piratarr_cmd()
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("0.0.0.0:7000"))
        .stdout(predicate::str::contains("piratarr.db"));
}

#[test]
fn test_cli_validate_rejects_port_zero() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[server]\nport = 0\n").unwrap();

    piratarr_cmd()
        .arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("port"));
}

#[test]
fn test_cli_validate_defaults() {
    piratarr_cmd()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("6919"));
}
