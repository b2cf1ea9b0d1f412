//! Common test utilities for nous integration tests.
//!
//! Provides `TestEnv` for isolated config directories and `MockServer`,
//! a minimal in-process HTTP server that records every request it
//! receives and replays canned responses in order.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with an isolated config directory.
///
/// The `nous()` method returns a `Command` that sets `NOUS_CONFIG_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub config_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the nous binary with an isolated config dir.
    ///
    /// `NOUS_SERVER` is cleared so an ambient value can't leak in.
    pub fn nous(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_nous"));
        cmd.env("NOUS_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("NOUS_SERVER");
        cmd
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.config_dir.path().join("config.toml")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// One HTTP request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string, e.g. `/api/notes?from=...`
    pub target: String,
    pub body: String,
}

/// A canned HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

/// Minimal single-threaded HTTP server for driving the CLI in tests.
///
/// Responses are consumed in order; once exhausted, the last one repeats.
/// The accept thread runs until the test process exits.
pub struct MockServer {
    url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub fn start(responses: Vec<MockResponse>) -> Self {
        assert!(!responses.is_empty(), "need at least one canned response");

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            let mut served = 0usize;
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let response = responses
                    .get(served)
                    .or_else(|| responses.last())
                    .cloned()
                    .unwrap();
                served += 1;
                handle_connection(stream, &response, &recorded);
            }
        });

        Self { url, requests }
    }

    /// Server that answers every request with `200 []`.
    pub fn empty_list() -> Self {
        Self::start(vec![MockResponse::json(200, "[]")])
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

// Records the request before writing the response, so `requests()` sees
// it as soon as the client has its answer.
fn handle_connection(
    stream: std::net::TcpStream,
    response: &MockResponse,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> Option<()> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some(value) = line
            .to_ascii_lowercase()
            .strip_prefix("content-length:")
            .map(str::trim)
            .and_then(|v| v.parse::<usize>().ok())
        {
            content_length = value;
        }
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body).ok()?;
    }

    recorded.lock().unwrap().push(RecordedRequest {
        method,
        target,
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let reason = match response.status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };
    let payload = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        reason,
        response.body.len(),
        response.body
    );
    let mut stream = reader.into_inner();
    stream.write_all(payload.as_bytes()).ok();
    stream.flush().ok();

    Some(())
}
