// src/render/mod.rs — Message rendering: sanitize, then markdown or literal text

pub mod highlight;
pub mod markdown;
pub mod sanitize;

use ratatui::text::{Line, Text};

use crate::backend::Role;
use crate::infra::config::UiConfig;
use crate::tui::theme::Theme;
use highlight::CodeHighlighter;

pub use sanitize::{sanitize, StreamSanitizer};

/// Pure `content -> styled text` function used for every message in the pane.
pub struct Renderer {
    highlighter: Option<CodeHighlighter>,
}

impl Renderer {
    pub fn new(config: &UiConfig) -> Self {
        let highlighter = config
            .highlight_code
            .then(|| CodeHighlighter::new(&config.syntax_theme));
        Self { highlighter }
    }

    /// Renderer without syntax highlighting.
    pub fn plain() -> Self {
        Self { highlighter: None }
    }

    /// Assistant content is markdown; user content is shown literally.
    pub fn render(&self, role: Role, content: &str) -> Text<'static> {
        match role {
            Role::Assistant => self.render_markdown(content),
            Role::User => render_literal(content),
        }
    }

    pub fn render_markdown(&self, content: &str) -> Text<'static> {
        markdown::render_markdown(&sanitize(content), self.highlighter.as_ref())
    }
}

pub fn render_literal(content: &str) -> Text<'static> {
    let clean = sanitize(content);
    Text::from(
        clean
            .split('\n')
            .map(|l| Line::styled(l.replace('\t', "    "), Theme::text()))
            .collect::<Vec<_>>(),
    )
}
