//! Toast notifications for the TUI.
//!
//! Failures (and a few confirmations) surface as dismissible toasts with
//! auto-expiry, instead of silently disappearing or blocking the editor.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::style::Color;

/// Maximum number of toasts to display at once
const MAX_VISIBLE_TOASTS: usize = 3;

/// Default auto-dismiss duration in seconds
const DEFAULT_DISMISS_SECONDS: u64 = 5;

/// Notification level (determines styling)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn color(&self) -> Color {
        match self {
            NotificationLevel::Info => Color::Blue,
            NotificationLevel::Success => Color::Green,
            NotificationLevel::Warning => Color::Yellow,
            NotificationLevel::Error => Color::Red,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✗",
        }
    }
}

/// A single toast notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub level: NotificationLevel,
    pub message: String,
    created_at: Instant,
    duration: Option<Duration>,
    dismissed: bool,
}

impl Toast {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        // Errors stay until dismissed; the rest auto-expire
        let duration = match level {
            NotificationLevel::Error => None,
            _ => Some(Duration::from_secs(DEFAULT_DISMISS_SECONDS)),
        };
        Self {
            level,
            message: message.into(),
            created_at: Instant::now(),
            duration,
            dismissed: false,
        }
    }

    fn is_expired(&self) -> bool {
        match self.duration {
            Some(duration) => self.created_at.elapsed() >= duration,
            None => false,
        }
    }
}

/// Toast queue with overflow handling.
#[derive(Debug, Default)]
pub struct NotificationManager {
    toasts: VecDeque<Toast>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.toasts.push_front(Toast::new(level, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, message);
    }

    /// Remove expired and dismissed toasts.
    pub fn cleanup(&mut self) {
        self.toasts.retain(|t| !t.dismissed && !t.is_expired());
    }

    /// Dismiss the newest toast (Esc). Returns false if there was none.
    pub fn dismiss_newest(&mut self) -> bool {
        match self.toasts.front_mut() {
            Some(toast) => {
                toast.dismissed = true;
                self.cleanup();
                true
            }
            None => false,
        }
    }

    pub fn visible_toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().take(MAX_VISIBLE_TOASTS)
    }

    pub fn has_toasts(&self) -> bool {
        !self.toasts.is_empty()
    }
}
