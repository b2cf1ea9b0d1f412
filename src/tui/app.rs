//! TUI Application - main event loop and terminal management
//!
//! This module contains the core TUI application logic including:
//! - Terminal setup and restoration
//! - Event loop for keyboard input and in-flight request results
//! - Key routing between the draft editor and the feed
//! - Rendering of the editor pane, feed, status bar, and toasts

use std::io::{self, stdout};
use std::time::Duration;

use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;

use super::editor::{DraftEditor, is_submit_chord};
use super::feed_view::FeedView;
use super::notifications::NotificationManager;
use crate::day::{Day, DayRange};
use crate::feed::NoteFeed;
use crate::models::body::assemble_tags;
use crate::models::{NewNote, Note};

/// Which pane receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Feed,
}

/// Network side effects requested by key handling; the event loop spawns
/// the actual requests so the app state stays synchronous and testable.
#[derive(Debug, PartialEq, Eq)]
pub enum AppAction {
    /// Post the draft as a new note
    SubmitCreate(NewNote),
    /// Flip done on a persisted note
    ToggleDone(String),
}

/// Results of spawned requests, delivered back through a channel.
enum TaskMessage {
    FetchFinished {
        result: Result<Vec<Note>, String>,
    },
    CreateFinished {
        result: Result<Option<Note>, String>,
        payload: NewNote,
    },
    ToggleFinished {
        id: String,
        result: Result<(), String>,
    },
}

/// TUI application state.
pub struct NotesApp {
    feed: NoteFeed,
    feed_view: FeedView,
    editor: DraftEditor,
    notifications: NotificationManager,
    day: Day,
    default_tags: Vec<String>,
    focus: Focus,
    should_quit: bool,
    needs_refresh: bool,
    fetch_in_flight: bool,
}

impl NotesApp {
    pub fn new(day: Day, default_tags: Vec<String>) -> Self {
        Self {
            feed: NoteFeed::new(),
            feed_view: FeedView::new(),
            editor: DraftEditor::new(),
            notifications: NotificationManager::new(),
            day,
            default_tags,
            focus: Focus::Editor,
            should_quit: false,
            needs_refresh: true,
            fetch_in_flight: false,
        }
    }

    /// Claim a pending refresh, at most one fetch outstanding. Returns the
    /// day to fetch; the event loop spawns the request and the feed shows
    /// `Loading` until the result comes back.
    fn take_refresh(&mut self) -> Option<Day> {
        if !self.needs_refresh || self.fetch_in_flight {
            return None;
        }
        self.needs_refresh = false;
        self.fetch_in_flight = true;
        self.feed.begin_fetch();
        Some(self.day)
    }

    /// Handle one keypress. Returns a network action for the event loop
    /// to spawn, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        // Quit and submit chords work regardless of focus
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }
        if key.code == KeyCode::Esc {
            if !self.notifications.dismiss_newest() {
                self.should_quit = true;
            }
            return None;
        }
        if is_submit_chord(&key) {
            return self.submit_draft();
        }
        if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.needs_refresh = true;
            return None;
        }
        if key.code == KeyCode::Tab {
            self.focus = match self.focus {
                Focus::Editor => Focus::Feed,
                Focus::Feed => Focus::Editor,
            };
            return None;
        }

        match self.focus {
            Focus::Editor => self.handle_editor_key(key),
            Focus::Feed => self.handle_feed_key(key),
        }
    }

    fn submit_draft(&mut self) -> Option<AppAction> {
        if self.editor.is_blank() {
            self.notifications.warning("Draft is empty, nothing to save");
            return None;
        }
        // One create at a time; repeated chords while saving do nothing
        if !self.feed.begin_create() {
            self.notifications.info("Already saving…");
            return None;
        }
        let body = self.editor.value();
        let tags = assemble_tags(Vec::new(), &self.default_tags, &body);
        Some(AppAction::SubmitCreate(NewNote::new(body, tags)))
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::ALT) =>
            {
                self.editor.insert(c)
            }
            KeyCode::Enter => self.editor.insert_newline(),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),
            KeyCode::Home => self.editor.move_home(),
            KeyCode::End => self.editor.move_end(),
            _ => {}
        }
        None
    }

    fn handle_feed_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.feed_view.select_next(self.feed.notes().len())
            }
            KeyCode::Char('k') | KeyCode::Up => self.feed_view.select_previous(),
            KeyCode::Char('g') | KeyCode::Home => self.feed_view.select_first(),
            KeyCode::Char('r') => self.needs_refresh = true,
            KeyCode::Char('[') => {
                self.day = self.day.previous();
                self.feed_view.select_first();
                self.needs_refresh = true;
            }
            KeyCode::Char(']') => {
                self.day = self.day.next();
                self.feed_view.select_first();
                self.needs_refresh = true;
            }
            KeyCode::Char('x') => {
                let selected_id = self
                    .feed
                    .notes()
                    .get(self.feed_view.selected())
                    .map(|note| note.id.clone());
                match selected_id {
                    Some(Some(id)) => return Some(AppAction::ToggleDone(id)),
                    Some(None) => self.notifications.warning("Note not saved yet"),
                    None => {}
                }
            }
            _ => {}
        }
        None
    }

    fn apply_fetch_result(&mut self, result: Result<Vec<Note>, String>) {
        self.fetch_in_flight = false;
        match result {
            Ok(notes) => {
                self.feed_view.clamp(notes.len());
                self.feed.fetch_succeeded(notes);
            }
            Err(message) => {
                tracing::warn!(%message, "fetch failed");
                self.feed.fetch_failed(message);
            }
        }
    }

    fn apply_task_message(&mut self, message: TaskMessage) {
        match message {
            TaskMessage::FetchFinished { result } => self.apply_fetch_result(result),
            TaskMessage::CreateFinished { result, payload } => {
                self.apply_create_result(result, payload)
            }
            TaskMessage::ToggleFinished { id, result } => self.apply_toggle_result(id, result),
        }
    }

    fn apply_create_result(&mut self, result: Result<Option<Note>, String>, payload: NewNote) {
        match result {
            Ok(confirmed) => {
                // Prefer the server echo; fall back to the local draft note
                let note = confirmed
                    .unwrap_or_else(|| Note::from_draft(payload.body, payload.tags));
                self.feed.create_succeeded(note);
                self.editor.clear();
                self.notifications.success("Note saved");
            }
            Err(message) => {
                // Draft stays put so nothing is lost
                self.feed.create_failed();
                self.notifications.error(format!("Save failed: {}", message));
            }
        }
    }

    fn apply_toggle_result(&mut self, id: String, result: Result<(), String>) {
        match result {
            Ok(()) => self.feed.done_toggled(&id),
            Err(message) => self
                .notifications
                .error(format!("Toggle failed: {}", message)),
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let editor_lines = self.editor.value().lines().count().max(1) as u16;
        let editor_height = (editor_lines + 2).clamp(3, 10);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(editor_height),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_editor(frame, chunks[0]);
        self.feed_view
            .render(frame, chunks[1], &self.feed, self.day, self.focus == Focus::Feed);
        self.render_status_bar(frame, chunks[2]);
        self.render_toasts(frame, area);
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Editor;
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title = if self.feed.is_create_in_flight() {
            " Draft (saving…) "
        } else {
            " Draft (ctrl+enter to save) "
        };

        let (row, col) = self.editor.cursor_position();
        let inner_height = area.height.saturating_sub(2);
        let scroll = (row + 1).saturating_sub(inner_height);

        let editor = Paragraph::new(self.editor.value())
            .scroll((scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title),
            );
        frame.render_widget(editor, area);

        if focused {
            frame.set_cursor_position((area.x + 1 + col, area.y + 1 + row.saturating_sub(scroll)));
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.focus {
            Focus::Editor => " ctrl+enter:Save  tab:Feed  ctrl+r:Refresh  esc:Quit",
            Focus::Feed => " j/k:Move  x:Done  [/]:Day  r:Refresh  tab:Editor  esc:Quit",
        };
        let status =
            Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(status, area);
    }

    fn render_toasts(&self, frame: &mut Frame, area: Rect) {
        let width = 44u16.min(area.width);
        for (i, toast) in self.notifications.visible_toasts().enumerate() {
            let height = 3u16;
            let y_offset = 1 + (i as u16) * height;
            if y_offset + height > area.height {
                break;
            }
            let rect = Rect::new(
                area.width.saturating_sub(width + 1),
                area.height.saturating_sub(y_offset + height),
                width,
                height,
            );
            let body = format!("{} {}", toast.level.icon(), toast.message);
            let widget = Paragraph::new(body).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(toast.level.color())),
            );
            frame.render_widget(Clear, rect);
            frame.render_widget(widget, rect);
        }
    }
}

/// Setup the terminal for TUI mode
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to normal mode
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// File-based logging; the terminal itself belongs to the TUI.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = dirs::cache_dir()?.join("nous");
    std::fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::never(dir, "tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok();
    Some(guard)
}

async fn fetch_notes(
    client: &reqwest::Client,
    base: &str,
    day: Day,
) -> Result<Vec<Note>, reqwest::Error> {
    let range = DayRange::single(day);
    client
        .get(format!("{}/api/notes", base))
        .query(&range.query_params())
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<Note>>()
        .await
}

async fn post_note(
    client: &reqwest::Client,
    base: &str,
    payload: &NewNote,
) -> Result<Option<Note>, reqwest::Error> {
    let response = client
        .post(format!("{}/api/note", base))
        .json(payload)
        .send()
        .await?
        .error_for_status()?;
    let body = response.text().await?;
    Ok(serde_json::from_str::<Note>(&body).ok())
}

async fn post_toggle(
    client: &reqwest::Client,
    base: &str,
    id: &str,
) -> Result<(), reqwest::Error> {
    client
        .post(format!("{}/api/note/toggle", base))
        .json(&serde_json::json!({ "id": id }))
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

/// Run the TUI application against the given server, starting on `day`.
pub async fn run_tui(
    server_url: &str,
    day: Day,
    default_tags: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let _log_guard = init_logging();
    tracing::info!(server = server_url, %day, "starting tui");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let base = server_url.trim_end_matches('/').to_string();

    let mut app = NotesApp::new(day, default_tags);
    let (tx, mut rx) = mpsc::unbounded_channel::<TaskMessage>();

    let mut terminal = setup_terminal()?;

    loop {
        // Fetches are spawned, never awaited here, so Loading renders and
        // keys keep working during a slow request
        if let Some(day) = app.take_refresh() {
            let client = client.clone();
            let tx = tx.clone();
            let base = base.clone();
            tokio::spawn(async move {
                let result = fetch_notes(&client, &base, day)
                    .await
                    .map_err(|e| e.to_string());
                let _ = tx.send(TaskMessage::FetchFinished { result });
            });
        }

        terminal.draw(|f| app.render(f))?;

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(100)) => {
                while event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press {
                            match app.handle_key(key) {
                                Some(AppAction::SubmitCreate(payload)) => {
                                    let client = client.clone();
                                    let tx = tx.clone();
                                    let base = base.clone();
                                    tokio::spawn(async move {
                                        let result = post_note(&client, &base, &payload)
                                            .await
                                            .map_err(|e| e.to_string());
                                        let _ = tx.send(TaskMessage::CreateFinished { result, payload });
                                    });
                                }
                                Some(AppAction::ToggleDone(id)) => {
                                    let client = client.clone();
                                    let tx = tx.clone();
                                    let base = base.clone();
                                    tokio::spawn(async move {
                                        let result = post_toggle(&client, &base, &id)
                                            .await
                                            .map_err(|e| e.to_string());
                                        let _ = tx.send(TaskMessage::ToggleFinished { id, result });
                                    });
                                }
                                None => {}
                            }
                        }
                    }
                }
            }
            msg = rx.recv() => {
                // A result arriving after quit is simply dropped with the app
                if let Some(msg) = msg {
                    app.apply_task_message(msg);
                }
            }
        }

        app.notifications.cleanup();

        if app.should_quit {
            break;
        }
    }

    restore_terminal()?;
    Ok(())
}
