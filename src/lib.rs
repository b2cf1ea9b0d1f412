//! Nous - a terminal client for a personal markdown note-taking API.
//!
//! This library provides the core functionality for the `nous` CLI tool:
//! fetching day-scoped note feeds, creating and editing notes, and the
//! state machine behind the interactive TUI editor.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod day;
pub mod feed;
pub mod models;
#[cfg(feature = "tui")]
pub mod tui;

/// Library-level error type for nous operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] api::ApiError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for nous operations.
pub type Result<T> = std::result::Result<T, Error>;
