//! Markdown-to-terminal rendering.
//!
//! Walks the pulldown-cmark event stream and produces styled ratatui
//! text. Notes are short and line-oriented, so a single newline renders
//! as a line break (the read view has always treated notes that way).
//! Anything the parser does not recognize degrades to literal text.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

/// Render a note body as styled terminal text.
pub fn render_markdown(source: &str) -> Text<'static> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(source, options);

    let mut renderer = Renderer::new();
    for event in parser {
        renderer.handle(event);
    }
    renderer.finish()
}

/// Numbering state for one nesting level of a list.
enum ListKind {
    Bullet,
    Ordered(u64),
}

struct Renderer {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<ListKind>,
    quote_depth: usize,
    in_code_block: bool,
    link_dest: Option<String>,
    link_text: String,
}

impl Renderer {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            spans: Vec::new(),
            style_stack: vec![Style::default()],
            list_stack: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
            link_dest: None,
            link_text: String::new(),
        }
    }

    fn style(&self) -> Style {
        *self.style_stack.last().unwrap_or(&Style::default())
    }

    fn push_style(&mut self, delta: Style) {
        self.style_stack.push(self.style().patch(delta));
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.link_dest.is_some() {
            self.link_text.push_str(text);
        }
        self.spans.push(Span::styled(text.to_string(), self.style()));
    }

    /// Close the current line, prefixing blockquote bars.
    fn flush_line(&mut self) {
        let mut spans = Vec::with_capacity(self.spans.len() + self.quote_depth);
        for _ in 0..self.quote_depth {
            spans.push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
        }
        spans.append(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    /// Separate blocks with one empty line.
    fn blank_line(&mut self) {
        if matches!(self.lines.last(), Some(line) if !line.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                self.blank_line();
            }

            Event::Start(Tag::Heading { level, .. }) => {
                let style = match level {
                    HeadingLevel::H1 => Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    _ => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                };
                self.push_style(style);
            }
            Event::End(TagEnd::Heading(_)) => {
                self.pop_style();
                self.flush_line();
                self.blank_line();
            }

            Event::Start(Tag::BlockQuote(_)) => {
                self.quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank_line();
            }

            Event::Start(Tag::CodeBlock(_)) => {
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.in_code_block = false;
                self.blank_line();
            }

            Event::Start(Tag::List(start)) => {
                self.list_stack.push(match start {
                    Some(n) => ListKind::Ordered(n),
                    None => ListKind::Bullet,
                });
            }
            Event::End(TagEnd::List(_)) => {
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }
            Event::Start(Tag::Item) => {
                let depth = self.list_stack.len().saturating_sub(1);
                let marker = match self.list_stack.last_mut() {
                    Some(ListKind::Ordered(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.spans
                    .push(Span::raw(format!("{}{}", "  ".repeat(depth), marker)));
            }
            Event::End(TagEnd::Item) => {
                if !self.spans.is_empty() {
                    self.flush_line();
                }
            }

            Event::Start(Tag::Emphasis) => {
                self.push_style(Style::default().add_modifier(Modifier::ITALIC))
            }
            Event::End(TagEnd::Emphasis) => self.pop_style(),
            Event::Start(Tag::Strong) => {
                self.push_style(Style::default().add_modifier(Modifier::BOLD))
            }
            Event::End(TagEnd::Strong) => self.pop_style(),
            Event::Start(Tag::Strikethrough) => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Event::End(TagEnd::Strikethrough) => self.pop_style(),

            Event::Start(Tag::Link { dest_url, .. }) => {
                self.link_dest = Some(dest_url.to_string());
                self.link_text.clear();
                self.push_style(
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            Event::End(TagEnd::Link) => {
                self.pop_style();
                if let Some(dest) = self.link_dest.take() {
                    // Skip the suffix for autolinks, where text == destination
                    if !dest.is_empty() && self.link_text != dest {
                        self.spans.push(Span::styled(
                            format!(" ({})", dest),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                }
            }

            Event::Text(text) => {
                if self.in_code_block {
                    let code_style = Style::default().fg(Color::Yellow);
                    for line in text.lines() {
                        self.spans.push(Span::styled(line.to_string(), code_style));
                        self.flush_line();
                    }
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => {
                self.spans.push(Span::styled(
                    code.to_string(),
                    self.style().fg(Color::Yellow),
                ));
            }

            Event::SoftBreak | Event::HardBreak => self.flush_line(),

            Event::Rule => {
                self.flush_line();
                self.lines.push(Line::styled(
                    "─".repeat(24),
                    Style::default().fg(Color::DarkGray),
                ));
                self.blank_line();
            }

            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.spans.push(Span::styled(
                    marker,
                    Style::default().fg(if checked { Color::Green } else { Color::DarkGray }),
                ));
            }

            Event::Html(html) | Event::InlineHtml(html) => {
                // Shown literally; the terminal has no use for raw HTML
                self.push_text(&html);
            }

            _ => {}
        }
    }

    fn finish(mut self) -> Text<'static> {
        if !self.spans.is_empty() {
            self.flush_line();
        }
        while matches!(self.lines.last(), Some(line) if line.spans.is_empty()) {
            self.lines.pop();
        }
        Text::from(self.lines)
    }
}
