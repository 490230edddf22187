// src/render/highlight.rs — Syntax highlighting for fenced code blocks (syntect)

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme as SynTheme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

const FALLBACK_THEME: &str = "base16-ocean.dark";

pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme: SynTheme,
}

impl CodeHighlighter {
    pub fn new(theme_name: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = match themes.remove(theme_name) {
            Some(t) => t,
            None => {
                tracing::warn!("Unknown syntax theme '{}', using {}", theme_name, FALLBACK_THEME);
                themes.remove(FALLBACK_THEME).unwrap_or_default()
            }
        };
        Self { syntax_set, theme }
    }

    /// Pick a syntax by fence tag, else guess from the first line, else plain text.
    fn syntax_for(&self, lang: Option<&str>, code: &str) -> &SyntaxReference {
        lang.and_then(|l| self.syntax_set.find_syntax_by_token(l))
            .or_else(|| {
                code.lines()
                    .next()
                    .and_then(|first| self.syntax_set.find_syntax_by_first_line(first))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    pub fn highlight(&self, code: &str, lang: Option<&str>, base: Style) -> Vec<Line<'static>> {
        let syntax = self.syntax_for(lang, code);
        let mut h = HighlightLines::new(syntax, &self.theme);

        LinesWithEndings::from(code)
            .map(|raw| {
                let ranges = h.highlight_line(raw, &self.syntax_set).unwrap_or_default();
                if ranges.is_empty() {
                    return Line::styled(trim_eol(raw).to_string(), base);
                }
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .map(|(style, seg)| (style, trim_eol(seg)))
                    .filter(|(_, seg)| !seg.is_empty())
                    .map(|(style, seg)| {
                        let fg = style.foreground;
                        Span::styled(seg.replace('\t', "    "), base.fg(Color::Rgb(fg.r, fg.g, fg.b)))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn trim_eol(s: &str) -> &str {
    s.trim_end_matches(['\n', '\r'])
}
