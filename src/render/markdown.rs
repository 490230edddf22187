// src/render/markdown.rs — Markdown to styled terminal lines (pulldown-cmark)
//
// Renders a complete document every time. Partial input (an unterminated code
// fence or emphasis run mid-stream) is valid markdown with a different shape,
// so callers re-render the whole accumulated text rather than appending.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

use super::highlight::CodeHighlighter;
use crate::tui::theme::Theme;

const RULE_WIDTH: usize = 32;

pub fn render_markdown(input: &str, highlighter: Option<&CodeHighlighter>) -> Text<'static> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut writer = Writer::new(highlighter);
    for event in Parser::new_ext(input, options) {
        writer.event(event);
    }
    writer.finish()
}

struct CodeBuffer {
    lang: Option<String>,
    text: String,
}

struct Writer<'h> {
    highlighter: Option<&'h CodeHighlighter>,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    quote_depth: usize,
    /// One entry per open list: next number for ordered lists.
    lists: Vec<Option<u64>>,
    code: Option<CodeBuffer>,
    link_dest: Option<String>,
}

impl<'h> Writer<'h> {
    fn new(highlighter: Option<&'h CodeHighlighter>) -> Self {
        Self {
            highlighter,
            lines: Vec::new(),
            spans: Vec::new(),
            styles: Vec::new(),
            quote_depth: 0,
            lists: Vec::new(),
            code: None,
            link_dest: None,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .iter()
            .fold(Theme::text(), |acc, s| acc.patch(*s))
    }

    fn event(&mut self, event: Event<'_>) {
        if let Some(code) = self.code.as_mut() {
            match event {
                Event::Text(t) => code.text.push_str(&t),
                Event::End(TagEnd::CodeBlock) => self.end_code_block(),
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(t) => {
                let style = self.style();
                self.push_text(&t, style);
            }
            Event::Code(t) => {
                self.ensure_prefix();
                self.spans.push(Span::styled(t.to_string(), Theme::inline_code()));
            }
            Event::Html(t) | Event::InlineHtml(t) => {
                self.push_text(&t, Theme::text_dim());
            }
            Event::SoftBreak | Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines
                    .push(Line::styled("─".repeat(RULE_WIDTH), Theme::rule()));
                self.blank_line();
            }
            Event::TaskListMarker(checked) => {
                self.ensure_prefix();
                let mark = if checked { "[x] " } else { "[ ] " };
                self.spans.push(Span::styled(mark, Theme::list_marker()));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {}
            Tag::Heading { level, .. } => {
                self.flush_line();
                self.styles.push(Theme::heading(level as usize));
            }
            Tag::BlockQuote { .. } => {
                self.flush_line();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush_line();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|l| l.to_string())
                        .filter(|l| !l.is_empty()),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeBuffer {
                    lang,
                    text: String::new(),
                });
            }
            Tag::List(start) => {
                self.flush_line();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush_line();
                self.ensure_prefix();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{}. ", n);
                        *n += 1;
                        m
                    }
                    _ => "• ".to_string(),
                };
                self.spans.push(Span::styled(marker, Theme::list_marker()));
            }
            Tag::Emphasis => self.styles.push(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.styles.push(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => self
                .styles
                .push(Style::default().add_modifier(Modifier::CROSSED_OUT)),
            Tag::Link { dest_url, .. } => {
                self.styles.push(Theme::link());
                self.link_dest = Some(dest_url.to_string());
            }
            Tag::Table(_) => self.flush_line(),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_line();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.flush_line();
                self.blank_line();
            }
            TagEnd::BlockQuote { .. } => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank_line();
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Item => self.flush_line(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(dest) = self.link_dest.take() {
                    let shown: String = self.spans.iter().map(|s| s.content.as_ref()).collect();
                    if !dest.is_empty() && !shown.ends_with(dest.as_str()) {
                        self.spans
                            .push(Span::styled(format!(" ({})", dest), Theme::text_dim()));
                    }
                }
            }
            TagEnd::TableCell => {
                self.spans.push(Span::styled(" │ ", Theme::rule()));
            }
            TagEnd::TableHead | TagEnd::TableRow => {
                self.spans.pop();
                self.flush_line();
            }
            TagEnd::Table => self.blank_line(),
            _ => {}
        }
    }

    fn end_code_block(&mut self) {
        let Some(code) = self.code.take() else {
            return;
        };
        let base = Theme::code_block();
        let body = code.text.strip_suffix('\n').unwrap_or(&code.text);

        let rendered: Vec<Line<'static>> = match self.highlighter {
            Some(h) => h.highlight(body, code.lang.as_deref(), base),
            None => body
                .split('\n')
                .map(|l| Line::styled(l.replace('\t', "    "), base))
                .collect(),
        };

        for mut line in rendered {
            line.spans.insert(0, Span::styled("  ", base));
            self.lines.push(line);
        }
        self.blank_line();
    }

    fn push_text(&mut self, text: &str, style: Style) {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.flush_line();
            }
            if part.is_empty() {
                continue;
            }
            self.ensure_prefix();
            self.spans.push(Span::styled(part.to_string(), style));
        }
    }

    /// Quote bars and list indentation for a fresh line.
    fn ensure_prefix(&mut self) {
        if !self.spans.is_empty() {
            return;
        }
        if self.quote_depth > 0 {
            self.spans
                .push(Span::styled("▏ ".repeat(self.quote_depth), Theme::quote()));
        }
        let indent = self.lists.len().saturating_sub(1) * 2;
        if indent > 0 {
            self.spans.push(Span::raw(" ".repeat(indent)));
        }
    }

    fn flush_line(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.end_code_block();
        self.flush_line();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        Text::from(self.lines)
    }
}
