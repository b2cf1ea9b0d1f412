//! Terminal User Interface module for nous.
//!
//! Provides a keyboard-driven editor-plus-feed view: a markdown draft pane
//! on top, the day's notes rendered beneath it, and toast notifications for
//! errors. Submitting with the command/ctrl+Enter chord posts the draft to
//! the notes API and prepends the confirmed note to the feed.

mod app;
mod editor;
mod feed_view;
mod markdown;
mod notifications;

pub use app::{AppAction, Focus, NotesApp, run_tui};
pub use editor::{DraftEditor, is_submit_chord};
pub use feed_view::FeedView;
pub use markdown::render_markdown;
pub use notifications::{NotificationLevel, NotificationManager, Toast};
