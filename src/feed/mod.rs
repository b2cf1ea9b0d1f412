//! Note feed controller.
//!
//! Pure state machine behind the note list: `Loading` until the first
//! fetch resolves, then `Ready` (with the fetched collection) or `Failed`.
//! From `Ready`, each confirmed create prepends one note. The displayed
//! collection is always "server state at last fetch, plus zero or more
//! optimistic prepends not yet reconciled by a refetch".

use crate::models::Note;

/// Lifecycle of the note feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    /// Fetch issued, nothing to show yet
    Loading,
    /// Fetch succeeded, collection is displayable
    Ready,
    /// Fetch failed; no automatic retry, a manual refresh re-enters Loading
    Failed(String),
}

/// The note list and its create-submission state.
#[derive(Debug)]
pub struct NoteFeed {
    state: FeedState,
    notes: Vec<Note>,
    create_in_flight: bool,
}

impl Default for NoteFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteFeed {
    pub fn new() -> Self {
        Self {
            state: FeedState::Loading,
            notes: Vec::new(),
            create_in_flight: false,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// Notes in display order (newest first, as fetched).
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_create_in_flight(&self) -> bool {
        self.create_in_flight
    }

    /// Re-enter `Loading` for a refetch. Optimistic prepends are kept
    /// visible until the fetch resolves.
    pub fn begin_fetch(&mut self) {
        self.state = FeedState::Loading;
    }

    /// A fetch resolved: replace the collection wholesale with the server's
    /// ordering. This is also how optimistic prepends reconcile.
    pub fn fetch_succeeded(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.state = FeedState::Ready;
    }

    /// A fetch failed: the feed shows a failure indicator. Create state is
    /// untouched.
    pub fn fetch_failed(&mut self, message: impl Into<String>) {
        self.notes.clear();
        self.state = FeedState::Failed(message.into());
    }

    /// Try to claim the create slot. Returns false while another create is
    /// outstanding, so rapid repeated submits issue exactly one request.
    pub fn begin_create(&mut self) -> bool {
        if self.create_in_flight {
            return false;
        }
        self.create_in_flight = true;
        true
    }

    /// A create resolved successfully: prepend the confirmed note. The
    /// caller clears the draft only after this.
    pub fn create_succeeded(&mut self, note: Note) {
        self.create_in_flight = false;
        self.notes.insert(0, note);
    }

    /// A create failed: the collection is left unchanged so the draft and
    /// the display stay consistent with the last known server state.
    pub fn create_failed(&mut self) {
        self.create_in_flight = false;
    }

    /// Flip the local done flag of the note with the given id, after the
    /// server confirmed the toggle.
    pub fn done_toggled(&mut self, id: &str) {
        if let Some(note) = self.notes.iter_mut().find(|n| n.id.as_deref() == Some(id)) {
            note.done = !note.done;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: Some(id.to_string()),
            body: body.to_string(),
            tags: Vec::new(),
            done: false,
        }
    }

    #[test]
    fn test_starts_loading_and_empty() {
        let feed = NoteFeed::new();
        assert_eq!(*feed.state(), FeedState::Loading);
        assert!(feed.notes().is_empty());
        assert!(!feed.is_create_in_flight());
    }

    #[test]
    fn test_fetch_success_preserves_server_order() {
        let mut feed = NoteFeed::new();
        feed.fetch_succeeded(vec![note("3", "c"), note("2", "b"), note("1", "a")]);
        assert_eq!(*feed.state(), FeedState::Ready);
        let ids: Vec<_> = feed.notes().iter().map(|n| n.display_id()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_fetch_failure_is_terminal_until_refresh() {
        let mut feed = NoteFeed::new();
        feed.fetch_failed("server returned HTTP 500");
        assert_eq!(
            *feed.state(),
            FeedState::Failed("server returned HTTP 500".to_string())
        );
        assert!(feed.notes().is_empty());

        feed.begin_fetch();
        assert_eq!(*feed.state(), FeedState::Loading);
    }

    #[test]
    fn test_create_prepends() {
        let mut feed = NoteFeed::new();
        feed.fetch_succeeded(vec![note("1", "old")]);

        assert!(feed.begin_create());
        feed.create_succeeded(note("2", "new"));

        let ids: Vec<_> = feed.notes().iter().map(|n| n.display_id()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert!(!feed.is_create_in_flight());
    }

    #[test]
    fn test_create_guard_rejects_overlapping_submits() {
        let mut feed = NoteFeed::new();
        feed.fetch_succeeded(vec![]);

        assert!(feed.begin_create());
        // Second submit while the first is outstanding
        assert!(!feed.begin_create());

        feed.create_succeeded(note("1", "a"));
        // Slot is free again
        assert!(feed.begin_create());
    }

    #[test]
    fn test_create_failure_leaves_collection_unchanged() {
        let mut feed = NoteFeed::new();
        feed.fetch_succeeded(vec![note("1", "a")]);

        assert!(feed.begin_create());
        feed.create_failed();

        assert_eq!(feed.notes().len(), 1);
        assert!(!feed.is_create_in_flight());
        // And the slot reopens for a retry
        assert!(feed.begin_create());
    }

    #[test]
    fn test_done_toggled_flips_matching_note_only() {
        let mut feed = NoteFeed::new();
        feed.fetch_succeeded(vec![note("2", "b"), note("1", "a")]);

        feed.done_toggled("1");
        assert!(!feed.notes()[0].done);
        assert!(feed.notes()[1].done);

        feed.done_toggled("1");
        assert!(!feed.notes()[1].done);

        // Unknown id is a no-op
        feed.done_toggled("99");
    }

    #[test]
    fn test_refetch_reconciles_optimistic_prepend() {
        let mut feed = NoteFeed::new();
        feed.fetch_succeeded(vec![note("1", "a")]);

        assert!(feed.begin_create());
        // Body-less create success: local note without id
        feed.create_succeeded(Note::from_draft("b", vec![]));
        assert_eq!(feed.notes().len(), 2);
        assert!(feed.notes()[0].id.is_none());

        // Refetch replaces wholesale; the server has assigned id 2
        feed.begin_fetch();
        feed.fetch_succeeded(vec![note("2", "b"), note("1", "a")]);
        assert_eq!(feed.notes().len(), 2);
        assert_eq!(feed.notes()[0].id.as_deref(), Some("2"));
    }
}
