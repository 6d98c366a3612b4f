//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, and that the
//! subcommands which need no network produce the expected JSON.

#![allow(deprecated)] // cargo_bin deprecation, replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `pmstream` binary.
///
/// Points the config at an unroutable API so a stray request fails fast.
fn pmstream() -> Command {
    let mut cmd = Command::cargo_bin("pmstream").expect("binary 'pmstream' should be built");
    cmd.env("PMSTREAM_API_BASE", "http://127.0.0.1:9/api")
        .env("PMSTREAM_TIMEOUT_SECS", "2")
        .env_remove("PMSTREAM_PREMIUM_KEY")
        .env_remove("RUST_LOG");
    cmd
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    pmstream()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: pmstream"))
        .stdout(predicate::str::contains("catalog"))
        .stdout(predicate::str::contains("streams"))
        .stdout(predicate::str::contains("classify"));
}

#[test]
fn version_flag_shows_semver() {
    pmstream()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^pmstream \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_shows_error_and_usage() {
    pmstream()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: pmstream"));
}

#[test]
fn invalid_subcommand_fails() {
    pmstream()
        .arg("this-is-not-a-real-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─── Subcommand help ─────────────────────────────────────────────────────────

#[test]
fn catalog_help() {
    pmstream()
        .args(["catalog", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("List catalog entries"))
        .stdout(predicate::str::contains("--category"))
        .stdout(predicate::str::contains("--type"));
}

#[test]
fn streams_help() {
    pmstream()
        .args(["streams", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve a composite id"))
        .stdout(predicate::str::contains("<ID>"));
}

#[test]
fn streams_missing_id_fails() {
    pmstream()
        .arg("streams")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<ID>"));
}

// ─── Offline behavior ────────────────────────────────────────────────────────

#[test]
fn classify_prints_tier() {
    pmstream()
        .args(["classify", "Show.2160p.mkv"])
        .assert()
        .success()
        .stdout("4K\n");

    pmstream()
        .args(["classify", "a.1080p.b.1440p"])
        .assert()
        .success()
        .stdout("2K\n");

    pmstream()
        .args(["classify", "nofield"])
        .assert()
        .success()
        .stdout("HD\n");
}

#[test]
fn streams_with_foreign_id_prints_empty_list() {
    pmstream()
        .args(["streams", "other:all:42"])
        .assert()
        .success()
        .stdout("{\"streams\":[]}\n");
}

#[test]
fn catalog_with_unsupported_type_prints_empty_list() {
    pmstream()
        .args(["catalog", "--type", "movie"])
        .assert()
        .success()
        .stdout("{\"metas\":[]}\n");
}

#[test]
fn unreachable_upstream_still_prints_empty_list() {
    pmstream()
        .args(["streams", "pm-content:all:42"])
        .assert()
        .success()
        .stdout("{\"streams\":[]}\n");
}

#[test]
fn missing_config_file_fails() {
    pmstream()
        .args(["--config", "/nonexistent/pmstream.toml", "classify", "x"])
        .assert()
        .success();

    pmstream()
        .args(["--config", "/nonexistent/pmstream.toml", "streams", "pm-content:all:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
