//! CLI argument definitions for nous.

use clap::{Parser, Subcommand};

/// Version string with build metadata from build.rs.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("NOUS_GIT_COMMIT"),
    ", built ",
    env!("NOUS_BUILD_TIMESTAMP"),
    ")"
);

/// Nous - a terminal client for a personal markdown notes API.
#[derive(Parser, Debug)]
#[command(name = "nous")]
#[command(author, version, long_version = LONG_VERSION)]
#[command(about = "Capture and browse markdown notes from the terminal", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Base URL of the notes API (e.g. http://localhost:8080).
    /// Can also be set via NOUS_SERVER or the config file.
    #[arg(short = 's', long = "server", global = true, env = crate::config::SERVER_ENV)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List notes, newest first
    List {
        /// Only notes from this day onward (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only notes up to this day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Shorthand for --from DAY --to DAY
        #[arg(long, conflicts_with_all = ["from", "to"])]
        on: Option<String>,
    },

    /// Create a new note
    Create {
        /// Markdown body; reads stdin when omitted or "-"
        body: Option<String>,

        /// Tags for the note (defaults come from config `default_tags`)
        #[arg(short, long)]
        tag: Vec<String>,
    },

    /// Show a single note
    Show {
        /// Note id
        id: String,
    },

    /// Flip a note's done state
    Toggle {
        /// Note id
        id: String,
    },

    /// Replace a note's body and tags
    Edit {
        /// Note id
        id: String,

        /// New markdown body
        #[arg(short, long)]
        body: String,

        /// New tags (replaces the existing set)
        #[arg(short, long)]
        tag: Vec<String>,
    },

    /// Delete a note
    Delete {
        /// Note id
        id: String,
    },

    /// Flip a markdown todo checkbox inside a note's body
    Todo {
        /// Note id
        id: String,

        /// Zero-based checkbox index within the body
        #[arg(default_value = "0")]
        index: usize,
    },

    /// Run the interactive editor and feed (requires the 'tui' feature)
    #[cfg(feature = "tui")]
    Tui {
        /// Day to open the feed on (YYYY-MM-DD, default today)
        #[arg(long)]
        on: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Get a single config value
    Get {
        /// Key (server_url, default_tags, output_format)
        key: String,
    },

    /// Set a config value
    Set {
        /// Key (server_url, default_tags, output_format)
        key: String,
        /// Value (tags are comma-separated)
        value: String,
    },

    /// Remove a config value
    Unset {
        /// Key (server_url, default_tags, output_format)
        key: String,
    },

    /// Print the config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_with_tags() {
        let cli = Cli::parse_from(["nous", "create", "hello", "-t", "a", "-t", "b"]);
        match cli.command {
            Commands::Create { body, tag } => {
                assert_eq!(body.as_deref(), Some("hello"));
                assert_eq!(tag, vec!["a", "b"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_on_conflicts_with_range() {
        let result = Cli::try_parse_from(["nous", "list", "--on", "2023-01-01", "--from", "2023-01-01"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_server_flag_reads_the_shared_env_var() {
        let command = Cli::command();
        let server = command
            .get_arguments()
            .find(|a| a.get_id() == "server")
            .expect("server arg");
        assert_eq!(
            server.get_env(),
            Some(std::ffi::OsStr::new(crate::config::SERVER_ENV))
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["nous", "list", "-H", "--server", "http://x:1"]);
        assert!(cli.human_readable);
        assert_eq!(cli.server.as_deref(), Some("http://x:1"));
    }
}
