//! Draft editor state.
//!
//! Holds the unsaved draft text and a cursor. The editor never clears
//! itself on submit; the app clears it only after the create is confirmed,
//! so a failed submit cannot lose text.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Returns true for the submit chord: command/meta (SUPER) or CONTROL
/// plus Enter. Enter alone, or a modifier without Enter, never submits.
pub fn is_submit_chord(key: &KeyEvent) -> bool {
    key.code == KeyCode::Enter
        && key
            .modifiers
            .intersects(KeyModifiers::SUPER | KeyModifiers::CONTROL)
}

/// A multi-line text buffer with a cursor.
#[derive(Debug, Default)]
pub struct DraftEditor {
    chars: Vec<char>,
    cursor: usize,
}

impl DraftEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current draft text.
    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// True if the draft contains no non-whitespace characters.
    pub fn is_blank(&self) -> bool {
        self.chars.iter().all(|c| c.is_whitespace())
    }

    /// Reset to empty after a confirmed create.
    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    /// Start of the current line.
    pub fn move_home(&mut self) {
        self.cursor = self.line_start(self.cursor);
    }

    /// End of the current line.
    pub fn move_end(&mut self) {
        self.cursor = self.line_end(self.cursor);
    }

    /// Previous line, keeping the column where possible.
    pub fn move_up(&mut self) {
        let start = self.line_start(self.cursor);
        if start == 0 {
            return;
        }
        let col = self.cursor - start;
        let prev_start = self.line_start(start - 1);
        let prev_end = start - 1;
        self.cursor = (prev_start + col).min(prev_end);
    }

    /// Next line, keeping the column where possible.
    pub fn move_down(&mut self) {
        let end = self.line_end(self.cursor);
        if end >= self.chars.len() {
            return;
        }
        let col = self.cursor - self.line_start(self.cursor);
        let next_start = end + 1;
        let next_end = self.line_end(next_start);
        self.cursor = (next_start + col).min(next_end);
    }

    /// Cursor position as (row, column), both zero-based.
    pub fn cursor_position(&self) -> (u16, u16) {
        let row = self.chars[..self.cursor].iter().filter(|c| **c == '\n').count();
        let col = self.cursor - self.line_start(self.cursor);
        (row as u16, col as u16)
    }

    fn line_start(&self, from: usize) -> usize {
        self.chars[..from]
            .iter()
            .rposition(|c| *c == '\n')
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    fn line_end(&self, from: usize) -> usize {
        self.chars[from..]
            .iter()
            .position(|c| *c == '\n')
            .map(|i| from + i)
            .unwrap_or(self.chars.len())
    }
}
