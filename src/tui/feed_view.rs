//! Feed view - renders the day's notes beneath the editor.
//!
//! Each note shows its markdown-formatted body followed by its tags in
//! order; done notes are dimmed and struck through. The view owns only
//! selection state; the collection itself lives in `NoteFeed`.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::markdown::render_markdown;
use crate::day::Day;
use crate::feed::{FeedState, NoteFeed};
use crate::models::Note;

pub struct FeedView {
    selected: usize,
    list_state: ListState,
}

impl Default for FeedView {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedView {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            selected: 0,
            list_state,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
        self.list_state.select(Some(self.selected));
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.list_state.select(Some(self.selected));
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.list_state.select(Some(0));
    }

    /// Keep the selection valid after the collection changed size.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
        self.list_state.select(Some(self.selected));
    }

    /// Rendered block for one note: markdown body, then one tag line (no
    /// tag line for an empty tag set).
    pub fn note_text(note: &Note) -> Text<'static> {
        let mut text = render_markdown(&note.body);
        if text.lines.is_empty() {
            text.lines.push(Line::default());
        }
        if note.done {
            let strike = Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT);
            for line in &mut text.lines {
                for span in &mut line.spans {
                    span.style = span.style.patch(strike);
                }
            }
        }
        if !note.tags.is_empty() {
            let mut spans = Vec::with_capacity(note.tags.len() * 2);
            for (i, tag) in note.tags.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(" "));
                }
                spans.push(Span::styled(
                    format!("#{}", tag),
                    Style::default().fg(Color::Magenta),
                ));
            }
            text.lines.push(Line::from(spans));
        }
        text
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, feed: &NoteFeed, day: Day, focused: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" Notes for {} ", day));

        match feed.state() {
            FeedState::Loading => {
                let loading = Paragraph::new("Fetching notes…")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block);
                frame.render_widget(loading, area);
            }
            FeedState::Failed(message) => {
                let failed = Paragraph::new(format!(
                    "Failed to load notes: {}\nPress r to retry.",
                    message
                ))
                .style(Style::default().fg(Color::Red))
                .block(block);
                frame.render_widget(failed, area);
            }
            FeedState::Ready => {
                if feed.notes().is_empty() {
                    let empty = Paragraph::new(format!("No notes for {}.", day))
                        .style(Style::default().fg(Color::DarkGray))
                        .block(block);
                    frame.render_widget(empty, area);
                    return;
                }

                let items: Vec<ListItem> = feed
                    .notes()
                    .iter()
                    .map(|note| {
                        let mut text = Self::note_text(note);
                        text.lines.push(Line::default());
                        ListItem::new(text)
                    })
                    .collect();

                let list = List::new(items)
                    .block(block)
                    .highlight_symbol("▌")
                    .highlight_style(Style::default().add_modifier(Modifier::BOLD));

                self.clamp(feed.notes().len());
                frame.render_stateful_widget(list, area, &mut self.list_state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(body: &str, tags: &[&str], done: bool) -> Note {
        Note {
            id: Some("1".to_string()),
            body: body.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            done,
        }
    }

    #[test]
    fn test_no_tag_line_for_empty_tags() {
        let text = FeedView::note_text(&note("hello", &[], false));
        assert_eq!(text.lines.len(), 1);
        assert_eq!(text.lines[0].spans[0].content.as_ref(), "hello");
    }

    #[test]
    fn test_tag_line_order() {
        let text = FeedView::note_text(&note("hello", &["a", "b"], false));
        let tag_line = text.lines.last().unwrap();
        let tags: Vec<_> = tag_line
            .spans
            .iter()
            .filter(|s| s.content.starts_with('#'))
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(tags, vec!["#a", "#b"]);
    }

    #[test]
    fn test_done_note_struck_through() {
        let text = FeedView::note_text(&note("hello", &[], true));
        assert!(text.lines[0].spans[0]
            .style
            .add_modifier
            .contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn test_tags_not_struck_for_done_note() {
        // The strike applies to the body; the tag line is appended after
        let text = FeedView::note_text(&note("hello", &["a"], true));
        let tag_span = &text.lines.last().unwrap().spans[0];
        assert!(!tag_span.style.add_modifier.contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn test_selection_navigation() {
        let mut view = FeedView::new();
        view.select_next(3);
        view.select_next(3);
        view.select_next(3);
        assert_eq!(view.selected(), 2);
        view.select_previous();
        assert_eq!(view.selected(), 1);
        view.select_first();
        assert_eq!(view.selected(), 0);
        view.select_previous();
        assert_eq!(view.selected(), 0);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut view = FeedView::new();
        view.select_next(5);
        view.select_next(5);
        view.clamp(2);
        assert_eq!(view.selected(), 1);
        view.clamp(0);
        assert_eq!(view.selected(), 0);
    }
}
