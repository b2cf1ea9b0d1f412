//! Data models for notes.
//!
//! This module defines the wire-level structures exchanged with the notes
//! API:
//! - `Note` - A persisted (or optimistically prepended) markdown note
//! - `NewNote` - The payload sent when creating a note

pub mod body;

use serde::{Deserialize, Serialize};

/// A markdown note.
///
/// `id` is assigned by the backend and is absent until the note has been
/// persisted; a note prepended optimistically after a body-less create
/// response has no id until the next refetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Backend-assigned identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Markdown source
    pub body: String,

    /// Ordered tag labels (may be empty)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Whether the note has been marked done
    #[serde(default)]
    pub done: bool,
}

impl Note {
    /// Build a local, not-yet-persisted note from draft text.
    pub fn from_draft(body: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            id: None,
            body: body.into(),
            tags,
            done: false,
        }
    }

    /// Identifier for display, or a placeholder for unsaved notes.
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("(unsaved)")
    }
}

/// Payload for creating a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    /// Markdown source
    pub body: String,

    /// Tag labels to attach
    pub tags: Vec<String>,
}

impl NewNote {
    pub fn new(body: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            body: body.into(),
            tags,
        }
    }

    /// True if the body contains no non-whitespace characters.
    ///
    /// Empty drafts are rejected before any request is issued.
    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_deserialize_wire_shape() {
        // Shape returned by GET /api/notes
        let json = r##"{"id":"42","body":"# hi","tags":["inbox","work"]}"##;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.id.as_deref(), Some("42"));
        assert_eq!(note.body, "# hi");
        assert_eq!(note.tags, vec!["inbox", "work"]);
        assert!(!note.done);
    }

    #[test]
    fn test_note_deserialize_with_done() {
        let json = r#"{"id":"7","body":"x","tags":[],"done":true}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert!(note.done);
    }

    #[test]
    fn test_note_serialize_omits_missing_id() {
        let note = Note::from_draft("hello", vec![]);
        let json = serde_json::to_string(&note).unwrap();
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn test_display_id_placeholder() {
        let note = Note::from_draft("hello", vec![]);
        assert_eq!(note.display_id(), "(unsaved)");
    }

    #[test]
    fn test_new_note_blank() {
        assert!(NewNote::new("", vec![]).is_blank());
        assert!(NewNote::new("  \n\t", vec![]).is_blank());
        assert!(!NewNote::new("x", vec![]).is_blank());
    }

    #[test]
    fn test_new_note_serialize() {
        let payload = NewNote::new("milk", vec!["shopping".to_string()]);
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"body":"milk","tags":["shopping"]}"#);
    }
}
