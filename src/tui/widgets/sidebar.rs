// src/tui/widgets/sidebar.rs — Session list with active marker, entry menu and inline rename.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::label;
use crate::client::sidebar::{EntryMode, Sidebar, SidebarEntry};
use crate::tui::theme::Theme;

pub const SIDEBAR_WIDTH: u16 = 32;

pub fn render(f: &mut Frame, area: Rect, sidebar: &Sidebar, focused: bool) {
    let block = Block::default()
        .title(Line::from(vec![
            Span::styled(" Sessions ", Theme::header()),
            Span::styled(format!("({}) ", sidebar.entries().len()), Theme::text_dim()),
        ]))
        .borders(Borders::ALL)
        .border_style(if focused {
            Theme::border_focus()
        } else {
            Theme::border()
        });

    if sidebar.entries().is_empty() {
        let empty = Paragraph::new(Line::styled(" No sessions yet", Theme::text_dim())).block(block);
        f.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = sidebar
        .entries()
        .iter()
        .map(|e| ListItem::new(entry_text(e, width)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(if focused {
            Theme::session_cursor()
        } else {
            Theme::text()
        });

    let mut state = ListState::default();
    state.select(Some(sidebar.cursor()));
    f.render_stateful_widget(list, area, &mut state);
}

fn entry_text(entry: &SidebarEntry, width: usize) -> Text<'static> {
    let marker = if entry.active {
        Span::styled("▌", Theme::session_marker())
    } else {
        Span::raw(" ")
    };

    let mut lines = Vec::with_capacity(3);
    match &entry.mode {
        EntryMode::Display => {
            let style = if entry.active {
                Theme::session_active()
            } else {
                Theme::text()
            };
            lines.push(Line::from(vec![
                marker,
                Span::styled(format!(" {}", label(&entry.name, width.saturating_sub(1))), style),
            ]));
        }
        EntryMode::Editing { draft } => {
            let shown = label(draft, width.saturating_sub(2));
            lines.push(Line::from(vec![
                marker,
                Span::raw(" "),
                Span::styled(format!("{shown}▏"), Theme::session_input()),
            ]));
        }
        EntryMode::Saving { draft } => {
            lines.push(Line::from(vec![
                marker,
                Span::styled(format!(" {}", label(draft, width.saturating_sub(10))), Theme::text()),
                Span::styled(" saving…", Theme::text_dim()),
            ]));
        }
    }

    if let Some(preview) = entry.preview.as_deref().filter(|p| !p.trim().is_empty()) {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(label(preview.trim(), width.saturating_sub(2)), Theme::text_dim()),
        ]));
    }

    if entry.menu_open {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(" r ", Theme::key_hint()),
            Span::styled("rename ", Theme::menu()),
            Span::styled(" d ", Theme::key_hint()),
            Span::styled("delete ", Theme::menu()),
        ]));
    }

    Text::from(lines)
}
