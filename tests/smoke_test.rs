//! Smoke tests: the binary parses arguments and reports its identity.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_version() {
    let env = TestEnv::new();
    env.nous()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nous"));
}

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    env.nous()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let env = TestEnv::new();
    env.nous().arg("frobnicate").assert().failure();
}

#[test]
fn test_no_subcommand_shows_usage() {
    let env = TestEnv::new();
    env.nous()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
