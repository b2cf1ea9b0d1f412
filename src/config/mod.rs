//! Configuration for nous.
//!
//! User preferences live in a single TOML file:
//!
//! - `~/.config/nous/config.toml` (or `$NOUS_CONFIG_DIR/config.toml`)
//!
//! ```toml
//! server_url = "http://localhost:8080"
//! default_tags = ["inbox"]
//! output_format = "human"  # or "json"
//! ```
//!
//! Precedence per value: CLI flag > environment (`NOUS_SERVER`) > config
//! file > built-in default.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable overriding the config directory (test isolation).
pub const CONFIG_DIR_ENV: &str = "NOUS_CONFIG_DIR";

/// Environment variable overriding the server URL.
pub const SERVER_ENV: &str = "NOUS_SERVER";

/// Built-in default server URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User preferences stored in config.toml. All fields optional; missing
/// values fall back to built-in defaults at resolve time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NousConfig {
    /// Base URL of the notes API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Tags attached to created notes when none are given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_tags: Option<Vec<String>>,

    /// Default output format for CLI commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
}

impl NousConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url) = self.server_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::Config(format!(
                    "server_url must start with http:// or https://, got {}",
                    url
                )));
            }
        }
        Ok(())
    }

    /// Path of the config file.
    pub fn path() -> Result<PathBuf> {
        let dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| Error::Config("could not determine config directory".to_string()))?
                .join("nous"),
        };
        Ok(dir.join("config.toml"))
    }

    /// Load the config file, or defaults if it does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(&path)?;
        let config: NousConfig = toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config file, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;
        fs::write(&path, raw)?;
        Ok(())
    }

    /// Set a key by name. Tags are comma-separated.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server_url" => self.server_url = Some(value.to_string()),
            "default_tags" => {
                self.default_tags = Some(
                    value
                        .split(',')
                        .map(|t| t.trim().to_lowercase())
                        .filter(|t| !t.is_empty())
                        .collect(),
                )
            }
            "output_format" => {
                self.output_format = Some(OutputFormat::parse(value).ok_or_else(|| {
                    Error::Config(format!("output_format must be json or human, got {}", value))
                })?)
            }
            _ => return Err(Error::Config(format!("unknown config key: {}", key))),
        }
        self.validate()
    }

    /// Unset a key by name.
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match key {
            "server_url" => self.server_url = None,
            "default_tags" => self.default_tags = None,
            "output_format" => self.output_format = None,
            _ => return Err(Error::Config(format!("unknown config key: {}", key))),
        }
        Ok(())
    }
}

/// Tracks where a resolved value came from, reported by `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    CliFlag,
    EnvVar,
    ConfigFile,
    Default,
}

impl ValueSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueSource::CliFlag => "cli flag",
            ValueSource::EnvVar => "env var",
            ValueSource::ConfigFile => "config file",
            ValueSource::Default => "default",
        }
    }
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fully resolved settings used by commands.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub server_url: String,
    pub server_source: ValueSource,
    pub default_tags: Vec<String>,
    pub output_format: OutputFormat,
}

/// Resolve effective settings from CLI overrides, environment, and the
/// config file.
///
/// `server_flag` carries `--server` when given; clap maps `NOUS_SERVER`
/// into the same flag, so env detection here distinguishes the two for
/// source reporting only.
pub fn resolve(server_flag: Option<&str>, human_flag: bool) -> Result<ResolvedConfig> {
    let config = NousConfig::load()?;

    let (server_url, server_source) = match server_flag {
        Some(url) => {
            let source = if std::env::var(SERVER_ENV).as_deref() == Ok(url) {
                ValueSource::EnvVar
            } else {
                ValueSource::CliFlag
            };
            (url.trim_end_matches('/').to_string(), source)
        }
        None => match config.server_url {
            Some(ref url) => (url.trim_end_matches('/').to_string(), ValueSource::ConfigFile),
            None => (DEFAULT_SERVER_URL.to_string(), ValueSource::Default),
        },
    };

    let output_format = if human_flag {
        OutputFormat::Human
    } else {
        config.output_format.unwrap_or_default()
    };

    Ok(ResolvedConfig {
        server_url,
        server_source,
        default_tags: config.default_tags.unwrap_or_default(),
        output_format,
    })
}
