//! Integration tests for `nous create`.

mod common;

use common::{MockResponse, MockServer, TestEnv};
use predicates::prelude::*;

const CREATED: &str = r#"{"id":"9","body":"buy milk","tags":["shopping"],"done":false}"#;

#[test]
fn test_create_posts_body_and_prints_echo() {
    let server = MockServer::start(vec![MockResponse::json(201, CREATED)]);
    let env = TestEnv::new();

    env.nous()
        .args(["-s", server.url(), "create", "buy milk", "--tag", "shopping"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\":\"9\""))
        .stdout(predicate::str::contains("\"confirmed\":true"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].target, "/api/note");

    let payload: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(payload["body"], "buy milk");
    assert_eq!(payload["tags"][0], "shopping");
}

#[test]
fn test_create_human_output() {
    let server = MockServer::start(vec![MockResponse::json(201, CREATED)]);
    let env = TestEnv::new();

    env.nous()
        .args(["-s", server.url(), "-H", "create", "buy milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created note 9"));
}

#[test]
fn test_create_extracts_mentions_as_tags() {
    let server = MockServer::start(vec![MockResponse::json(201, CREATED)]);
    let env = TestEnv::new();

    env.nous()
        .args([
            "-s",
            server.url(),
            "create",
            "lunch with @Alice and @bob",
            "--tag",
            "social",
        ])
        .assert()
        .success();

    let payload: serde_json::Value =
        serde_json::from_str(&server.requests()[0].body).unwrap();
    let tags: Vec<&str> = payload["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["social", "alice", "bob"]);
}

#[test]
fn test_create_reads_stdin_with_dash() {
    let server = MockServer::start(vec![MockResponse::json(201, CREATED)]);
    let env = TestEnv::new();

    env.nous()
        .args(["-s", server.url(), "create", "-"])
        .write_stdin("piped note body\n")
        .assert()
        .success();

    let payload: serde_json::Value =
        serde_json::from_str(&server.requests()[0].body).unwrap();
    assert_eq!(payload["body"], "piped note body\n");
}

#[test]
fn test_create_blank_body_is_rejected_without_request() {
    let server = MockServer::empty_list();
    let env = TestEnv::new();

    env.nous()
        .args(["-s", server.url(), "create", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty note"));

    assert!(server.requests().is_empty());
}

#[test]
fn test_create_tolerates_bodyless_success() {
    // Some deployments answer 201 with an empty body; the note is still
    // reported, just unconfirmed.
    let server = MockServer::start(vec![MockResponse::json(201, "")]);
    let env = TestEnv::new();

    env.nous()
        .args(["-s", server.url(), "create", "fire and forget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"confirmed\":false"));
}

#[test]
fn test_create_server_error_exits_nonzero() {
    let server = MockServer::start(vec![MockResponse::json(500, r#"{"error":"boom"}"#)]);
    let env = TestEnv::new();

    env.nous()
        .args(["-s", server.url(), "create", "doomed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("500"));
}

#[test]
fn test_create_uses_default_tags_from_config() {
    let server = MockServer::start(vec![MockResponse::json(201, CREATED)]);
    let env = TestEnv::new();

    env.nous()
        .args(["config", "set", "default_tags", "inbox"])
        .assert()
        .success();

    env.nous()
        .args(["-s", server.url(), "create", "untagged thought"])
        .assert()
        .success();

    let payload: serde_json::Value =
        serde_json::from_str(&server.requests()[0].body).unwrap();
    assert_eq!(payload["tags"][0], "inbox");
}

#[test]
fn test_create_explicit_tags_override_defaults() {
    let server = MockServer::start(vec![MockResponse::json(201, CREATED)]);
    let env = TestEnv::new();

    env.nous()
        .args(["config", "set", "default_tags", "inbox"])
        .assert()
        .success();

    env.nous()
        .args(["-s", server.url(), "create", "tagged", "--tag", "work"])
        .assert()
        .success();

    let payload: serde_json::Value =
        serde_json::from_str(&server.requests()[0].body).unwrap();
    let tags: Vec<&str> = payload["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["work"]);
}
