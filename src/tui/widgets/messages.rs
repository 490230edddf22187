// src/tui/widgets/messages.rs — Conversation pane with typing indicator.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::label;
use crate::backend::Role;
use crate::client::pane::MessagePane;
use crate::tui::theme::Theme;

pub fn render(f: &mut Frame, area: Rect, pane: &MessagePane, title: &str) {
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", label(title, area.width.saturating_sub(4) as usize)),
            Theme::header(),
        ))
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);

    let lines = pane_lines(pane);
    let rows = wrapped_rows(&lines, inner.width);
    let bottom = rows.saturating_sub(inner.height as usize);
    let offset = bottom.saturating_sub(pane.scroll_from_bottom() as usize);

    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(p, area);
}

fn pane_lines(pane: &MessagePane) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in pane.messages() {
        let label = match message.role {
            Role::User => Span::styled("You", Theme::user_label()),
            Role::Assistant => Span::styled("Tutor", Theme::assistant_label()),
        };
        lines.push(Line::from(label));
        lines.extend(message.rendered.lines.iter().cloned());
        lines.push(Line::default());
    }
    if pane.is_typing() {
        lines.push(Line::styled("Tutor is typing…", Theme::typing()));
    }
    lines
}

/// Rows the lines occupy once wrapped at `width` columns.
fn wrapped_rows(lines: &[Line<'_>], width: u16) -> usize {
    let width = width.max(1) as usize;
    lines
        .iter()
        .map(|line| {
            let w: usize = line.spans.iter().map(|s| s.content.width()).sum();
            w.div_ceil(width).max(1)
        })
        .sum()
}
