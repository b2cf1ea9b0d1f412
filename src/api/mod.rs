//! Blocking HTTP client for the notes API.
//!
//! One attempt per request, no retry, no backoff. Non-2xx statuses and
//! transport failures both surface as `ApiError` carrying whatever the
//! server said.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::day::DayRange;
use crate::models::{NewNote, Note};

/// Default request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from talking to the notes API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Server answered with a non-2xx status
    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Network or other transport error
    #[error("request failed: {0}")]
    Transport(String),

    /// Response body was not what we expected
    #[error("failed to parse server response: {0}")]
    Parse(String),
}

impl ApiError {
    fn from_ureq(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, resp) => {
                let body = resp.into_string().unwrap_or_default();
                ApiError::Status { status, body }
            }
            other => ApiError::Transport(other.to_string()),
        }
    }
}

/// Toggle-done payload, `POST /api/note/toggle`.
#[derive(Debug, Serialize)]
struct TogglePayload<'a> {
    id: &'a str,
}

/// Client for the notes API.
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `http://localhost:8080`).
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the notes feed, optionally scoped to a day range.
    ///
    /// The server returns notes newest first; the order is preserved.
    pub fn fetch_notes(&self, range: Option<&DayRange>) -> Result<Vec<Note>, ApiError> {
        let mut request = self.agent.get(&self.url("/api/notes"));
        if let Some(range) = range {
            for (key, value) in range.query_params() {
                request = request.query(key, &value);
            }
        }

        let response = request.call().map_err(ApiError::from_ureq)?;
        response
            .into_json::<Vec<Note>>()
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Create a note. Returns the persisted note when the server echoes it
    /// back, `None` on a body-less success.
    pub fn create_note(&self, note: &NewNote) -> Result<Option<Note>, ApiError> {
        let response = self
            .agent
            .post(&self.url("/api/note"))
            .send_json(note)
            .map_err(ApiError::from_ureq)?;

        let body = response
            .into_string()
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        // Some server builds answer 201 with a plain OK body instead of the note
        Ok(serde_json::from_str::<Note>(&body).ok())
    }

    /// Flip a note's done state.
    pub fn toggle_done(&self, id: &str) -> Result<(), ApiError> {
        self.agent
            .post(&self.url("/api/note/toggle"))
            .send_json(TogglePayload { id })
            .map_err(ApiError::from_ureq)?;
        Ok(())
    }

    /// Replace a note's body and tags.
    pub fn update_note(&self, id: &str, note: &NewNote) -> Result<(), ApiError> {
        self.agent
            .post(&self.url(&format!("/api/note/{}", id)))
            .send_json(note)
            .map_err(ApiError::from_ureq)?;
        Ok(())
    }

    /// Delete a note.
    pub fn delete_note(&self, id: &str) -> Result<(), ApiError> {
        self.agent
            .delete(&self.url(&format!("/api/note/{}", id)))
            .call()
            .map_err(ApiError::from_ureq)?;
        Ok(())
    }

    /// Fetch a single note by id.
    pub fn get_note(&self, id: &str) -> Result<Note, ApiError> {
        let response = self
            .agent
            .get(&self.url(&format!("/api/note/{}", id)))
            .call()
            .map_err(ApiError::from_ureq)?;
        response
            .into_json::<Note>()
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("/api/notes"), "http://localhost:8080/api/notes");
    }

    #[test]
    fn test_note_path_includes_id() {
        let client = ApiClient::new("http://localhost:8080");
        assert_eq!(client.url("/api/note/42"), "http://localhost:8080/api/note/42");
    }

    #[test]
    fn test_unreachable_server_is_transport_error() {
        // Nothing listens on this port
        let client = ApiClient::new("http://127.0.0.1:1");
        match client.fetch_notes(None) {
            Err(ApiError::Transport(_)) => {}
            other => panic!("expected transport error, got {:?}", other.map(|n| n.len())),
        }
    }

    #[test]
    fn test_toggle_payload_shape() {
        let json = serde_json::to_string(&TogglePayload { id: "42" }).unwrap();
        assert_eq!(json, r#"{"id":"42"}"#);
    }
}
