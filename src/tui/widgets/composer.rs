// src/tui/widgets/composer.rs — Single-line message input.

use ratatui::{
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::theme::Theme;

pub fn render(f: &mut Frame, area: Rect, text: &str, focused: bool, streaming: bool) {
    let title = if streaming {
        Span::styled(" Replying… Esc to stop ", Theme::typing())
    } else {
        Span::styled(" Message ", Theme::header())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Theme::border_focus()
        } else {
            Theme::border()
        });
    let inner = block.inner(area);

    // Keep the end of long input visible.
    let width = text.width();
    let visible = inner.width.saturating_sub(1) as usize;
    let shown: String = if width > visible {
        let mut skip = width - visible;
        text.chars()
            .skip_while(|c| {
                let w = unicode_width::UnicodeWidthChar::width(*c).unwrap_or(0);
                if skip == 0 {
                    return false;
                }
                skip = skip.saturating_sub(w);
                true
            })
            .collect()
    } else {
        text.to_string()
    };

    let cursor_x = inner.x + shown.width() as u16;
    f.render_widget(
        Paragraph::new(Line::styled(shown, Theme::text())).block(block),
        area,
    );
    if focused {
        f.set_cursor_position(Position::new(cursor_x, inner.y));
    }
}
