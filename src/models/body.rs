//! Note-body utilities: @mention extraction and todo checkboxes.

use std::sync::OnceLock;

use regex::Regex;

use crate::{Error, Result};

fn mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\B@([\w]+)").expect("mention regex"))
}

fn todo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"- \[[ xX]\]").expect("todo regex"))
}

/// Extract @mentioned names from note text, without the leading `@`.
///
/// Mentions must start a word (`a@b` does not count). Order of appearance
/// is preserved and duplicates are kept.
pub fn extract_mentions(text: &str) -> Vec<String> {
    mention_re()
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Assemble the tag set for a note: explicit tags, or the configured
/// defaults when none are given, plus @mentions extracted from the body.
/// Lowercased, deduplicated, order preserved.
pub fn assemble_tags(explicit: Vec<String>, defaults: &[String], body: &str) -> Vec<String> {
    let base = if explicit.is_empty() {
        defaults.to_vec()
    } else {
        explicit
    };
    let mut tags: Vec<String> = Vec::new();
    for tag in base.into_iter().chain(extract_mentions(body)) {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Flip the `index`th markdown todo checkbox in `body`.
///
/// `- [ ]` becomes `- [x]` and `- [x]`/`- [X]` become `- [ ]`. The rest of
/// the body is returned unchanged. Errors if there is no checkbox at that
/// index.
pub fn toggle_todo(body: &str, index: usize) -> Result<String> {
    let m = todo_re()
        .find_iter(body)
        .nth(index)
        .ok_or_else(|| Error::InvalidInput(format!("no todo at index {}", index)))?;

    let replacement = match &body[m.start()..m.end()] {
        "- [x]" | "- [X]" => "- [ ]",
        _ => "- [x]",
    };

    let mut out = String::with_capacity(body.len());
    out.push_str(&body[..m.start()]);
    out.push_str(replacement);
    out.push_str(&body[m.end()..]);
    Ok(out)
}
