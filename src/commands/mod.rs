//! Command implementations for the nous CLI.
//!
//! Each command talks to the notes API through the blocking `ApiClient`
//! and returns a result struct that can render itself as JSON (default)
//! or human-readable text (`-H`).

use std::io::Read;

use serde::Serialize;

use crate::api::ApiClient;
use crate::config::{NousConfig, ResolvedConfig};
use crate::day::{Day, DayRange};
use crate::models::body::{assemble_tags, toggle_todo};
use crate::models::{NewNote, Note};
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_of<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

/// One-line digest of a note for terminal listings.
fn note_digest(note: &Note) -> String {
    let marker = if note.done { "[x]" } else { "[ ]" };
    let tags = if note.tags.is_empty() {
        String::new()
    } else {
        format!(
            "  {}",
            note.tags
                .iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" ")
        )
    };
    let mut lines = note.body.lines();
    let first = lines.next().unwrap_or("");
    let more = if lines.next().is_some() { " …" } else { "" };
    format!("{} {} {}{}{}", marker, note.display_id(), first, more, tags)
}

/// Result of `nous list`.
#[derive(Debug, Serialize)]
pub struct ListResult {
    pub notes: Vec<Note>,
}

impl Output for ListResult {
    fn to_json(&self) -> String {
        json_of(&self.notes)
    }

    fn to_human(&self) -> String {
        if self.notes.is_empty() {
            return "No notes.".to_string();
        }
        self.notes
            .iter()
            .map(note_digest)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Result of `nous create`.
#[derive(Debug, Serialize)]
pub struct CreateResult {
    pub note: Note,
    /// True when the server echoed the persisted note back
    pub confirmed: bool,
}

impl Output for CreateResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Created note {}", self.note.display_id())
    }
}

/// Result of `nous show`.
#[derive(Debug, Serialize)]
pub struct ShowResult {
    pub note: Note,
}

impl Output for ShowResult {
    fn to_json(&self) -> String {
        json_of(&self.note)
    }

    fn to_human(&self) -> String {
        let mut out = self.note.body.clone();
        if !self.note.tags.is_empty() {
            out.push('\n');
            for tag in &self.note.tags {
                out.push('#');
                out.push_str(tag);
                out.push(' ');
            }
        }
        out.trim_end().to_string()
    }
}

/// Result of toggle/edit/delete/todo.
#[derive(Debug, Serialize)]
pub struct ActionResult {
    pub action: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ActionResult {
    fn new(action: &str, id: &str) -> Self {
        Self {
            action: action.to_string(),
            id: id.to_string(),
            body: None,
        }
    }
}

impl Output for ActionResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        match &self.body {
            Some(body) => format!("{} note {}\n{}", capitalize(&self.action), self.id, body),
            None => format!("{} note {}", capitalize(&self.action), self.id),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn parse_day(s: &str) -> Result<Day> {
    s.parse()
}

fn range_from_args(
    from: Option<&str>,
    to: Option<&str>,
    on: Option<&str>,
) -> Result<Option<DayRange>> {
    if let Some(day) = on {
        return Ok(Some(DayRange::single(parse_day(day)?)));
    }
    match (from, to) {
        (None, None) => Ok(None),
        (Some(f), Some(t)) => {
            let from = parse_day(f)?;
            let to = parse_day(t)?;
            if from > to {
                return Err(Error::InvalidInput(format!(
                    "--from {} is after --to {}",
                    from, to
                )));
            }
            Ok(Some(DayRange::new(from, to)))
        }
        (Some(f), None) => {
            let from = parse_day(f)?;
            Ok(Some(DayRange::new(from, Day::today())))
        }
        (None, Some(t)) => Err(Error::InvalidInput(format!(
            "--to {} requires --from",
            t
        ))),
    }
}

/// Fetch and return the feed.
pub fn list(
    config: &ResolvedConfig,
    from: Option<&str>,
    to: Option<&str>,
    on: Option<&str>,
) -> Result<ListResult> {
    let range = range_from_args(from, to, on)?;
    let client = ApiClient::new(&config.server_url);
    let notes = client.fetch_notes(range.as_ref())?;
    Ok(ListResult { notes })
}

/// Create a note. `body` of `None` or `"-"` reads stdin.
pub fn create(
    config: &ResolvedConfig,
    body: Option<String>,
    tags: Vec<String>,
) -> Result<CreateResult> {
    let body = match body.as_deref() {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(text) => text.to_string(),
    };

    let tags = assemble_tags(tags, &config.default_tags, &body);
    let payload = NewNote::new(body, tags);
    if payload.is_blank() {
        return Err(Error::InvalidInput("refusing to create an empty note".to_string()));
    }

    let client = ApiClient::new(&config.server_url);
    match client.create_note(&payload)? {
        Some(note) => Ok(CreateResult {
            note,
            confirmed: true,
        }),
        None => Ok(CreateResult {
            note: Note::from_draft(payload.body, payload.tags),
            confirmed: false,
        }),
    }
}

/// Fetch a single note.
pub fn show(config: &ResolvedConfig, id: &str) -> Result<ShowResult> {
    let client = ApiClient::new(&config.server_url);
    let note = client.get_note(id)?;
    Ok(ShowResult { note })
}

/// Flip a note's done state.
pub fn toggle(config: &ResolvedConfig, id: &str) -> Result<ActionResult> {
    let client = ApiClient::new(&config.server_url);
    client.toggle_done(id)?;
    Ok(ActionResult::new("toggled", id))
}

/// Replace a note's body and tags.
pub fn edit(
    config: &ResolvedConfig,
    id: &str,
    body: String,
    tags: Vec<String>,
) -> Result<ActionResult> {
    let tags = assemble_tags(tags, &[], &body);
    let payload = NewNote::new(body, tags);
    if payload.is_blank() {
        return Err(Error::InvalidInput("refusing to save an empty note".to_string()));
    }
    let client = ApiClient::new(&config.server_url);
    client.update_note(id, &payload)?;
    Ok(ActionResult::new("edited", id))
}

/// Delete a note.
pub fn delete(config: &ResolvedConfig, id: &str) -> Result<ActionResult> {
    let client = ApiClient::new(&config.server_url);
    client.delete_note(id)?;
    Ok(ActionResult::new("deleted", id))
}

/// Flip the `index`th todo checkbox inside a note's body and save it.
pub fn todo(config: &ResolvedConfig, id: &str, index: usize) -> Result<ActionResult> {
    let client = ApiClient::new(&config.server_url);
    let note = client.get_note(id)?;
    let body = toggle_todo(&note.body, index)?;
    client.update_note(id, &NewNote::new(body.clone(), note.tags))?;
    let mut result = ActionResult::new("updated", id);
    result.body = Some(body);
    Ok(result)
}

/// Result of config get/set/unset.
#[derive(Debug, Serialize)]
pub struct ConfigResult {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Output for ConfigResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        match &self.value {
            Some(value) => format!("{} = {}", self.key, value),
            None => format!("{} is not set", self.key),
        }
    }
}

/// Result of `nous config show`: the stored file plus the effective
/// server URL and where it came from.
#[derive(Debug, Serialize)]
pub struct ConfigShowResult {
    pub config: NousConfig,
    pub server_url: String,
    pub server_source: String,
}

impl Output for ConfigShowResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let stored = toml::to_string_pretty(&self.config)
            .unwrap_or_else(|_| "(invalid config)".to_string());
        let stored = if stored.trim().is_empty() {
            "(no stored values)".to_string()
        } else {
            stored.trim_end().to_string()
        };
        format!(
            "{}\n\nserver_url = {} (from {})",
            stored, self.server_url, self.server_source
        )
    }
}

/// Show the stored configuration and the resolved server URL.
pub fn config_show(resolved: &ResolvedConfig) -> Result<ConfigShowResult> {
    Ok(ConfigShowResult {
        config: NousConfig::load()?,
        server_url: resolved.server_url.clone(),
        server_source: resolved.server_source.as_str().to_string(),
    })
}

fn config_value(config: &NousConfig, key: &str) -> Result<Option<String>> {
    match key {
        "server_url" => Ok(config.server_url.clone()),
        "default_tags" => Ok(config.default_tags.as_ref().map(|t| t.join(","))),
        "output_format" => Ok(config.output_format.map(|f| f.to_string())),
        _ => Err(Error::Config(format!("unknown config key: {}", key))),
    }
}

/// Get one configuration value.
pub fn config_get(key: &str) -> Result<ConfigResult> {
    let config = NousConfig::load()?;
    Ok(ConfigResult {
        value: config_value(&config, key)?,
        key: key.to_string(),
    })
}

/// Set one configuration value and save.
pub fn config_set(key: &str, value: &str) -> Result<ConfigResult> {
    let mut config = NousConfig::load()?;
    config.set(key, value)?;
    config.save()?;
    Ok(ConfigResult {
        value: config_value(&config, key)?,
        key: key.to_string(),
    })
}

/// Remove one configuration value and save.
pub fn config_unset(key: &str) -> Result<ConfigResult> {
    let mut config = NousConfig::load()?;
    config.unset(key)?;
    config.save()?;
    Ok(ConfigResult {
        key: key.to_string(),
        value: None,
    })
}

/// Result of `nous config path`.
#[derive(Debug, Serialize)]
pub struct ConfigPathResult {
    pub path: String,
}

impl Output for ConfigPathResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        self.path.clone()
    }
}

/// Print the config file location.
pub fn config_path() -> Result<ConfigPathResult> {
    Ok(ConfigPathResult {
        path: NousConfig::path()?.display().to_string(),
    })
}
