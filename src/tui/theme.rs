// src/tui/theme.rs — Color scheme and style definitions for the chat UI.

use ratatui::style::{Color, Modifier, Style};

/// Chalkboard-inspired palette.
pub struct Theme;

impl Theme {
    // ── Palette ──────────────────────────────────────────────────
    pub const CHALK: Color = Color::Rgb(236, 236, 228);
    pub const BOARD: Color = Color::Rgb(24, 32, 28);
    pub const SLATE: Color = Color::Rgb(40, 48, 56);
    pub const AMBER: Color = Color::Rgb(240, 180, 60);
    pub const TEAL: Color = Color::Rgb(80, 190, 180);
    pub const SKY: Color = Color::Rgb(110, 160, 230);
    pub const MINT: Color = Color::Rgb(120, 210, 140);
    pub const BRICK: Color = Color::Rgb(220, 90, 80);
    pub const GRAY: Color = Color::Rgb(130, 135, 145);
    pub const DIM: Color = Color::Rgb(85, 90, 100);

    // ── Chrome ───────────────────────────────────────────────────

    pub fn header() -> Style {
        Style::default().fg(Theme::AMBER).add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Theme::DIM)
    }

    pub fn border_focus() -> Style {
        Style::default().fg(Theme::AMBER)
    }

    pub fn text() -> Style {
        Style::default().fg(Theme::CHALK)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    pub fn error() -> Style {
        Style::default().fg(Theme::BRICK)
    }

    pub fn key_hint() -> Style {
        Style::default().fg(Theme::AMBER).add_modifier(Modifier::BOLD)
    }

    pub fn key_desc() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    // ── Sidebar ──────────────────────────────────────────────────

    pub fn session_active() -> Style {
        Style::default().fg(Theme::CHALK).add_modifier(Modifier::BOLD)
    }

    pub fn session_marker() -> Style {
        Style::default().fg(Theme::AMBER)
    }

    pub fn session_cursor() -> Style {
        Style::default().bg(Theme::SLATE)
    }

    pub fn session_input() -> Style {
        Style::default()
            .fg(Theme::CHALK)
            .bg(Theme::SLATE)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn menu() -> Style {
        Style::default().fg(Theme::CHALK).bg(Theme::SLATE)
    }

    // ── Messages ─────────────────────────────────────────────────

    pub fn user_label() -> Style {
        Style::default().fg(Theme::SKY).add_modifier(Modifier::BOLD)
    }

    pub fn assistant_label() -> Style {
        Style::default().fg(Theme::MINT).add_modifier(Modifier::BOLD)
    }

    pub fn typing() -> Style {
        Style::default()
            .fg(Theme::MINT)
            .add_modifier(Modifier::ITALIC)
    }

    // ── Markdown ─────────────────────────────────────────────────

    pub fn heading(level: usize) -> Style {
        let color = match level {
            1 => Theme::AMBER,
            2 => Theme::TEAL,
            _ => Theme::SKY,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn inline_code() -> Style {
        Style::default().fg(Theme::AMBER).bg(Theme::SLATE)
    }

    pub fn code_block() -> Style {
        Style::default().fg(Theme::CHALK).bg(Theme::BOARD)
    }

    pub fn quote() -> Style {
        Style::default().fg(Theme::DIM)
    }

    pub fn list_marker() -> Style {
        Style::default().fg(Theme::TEAL)
    }

    pub fn link() -> Style {
        Style::default()
            .fg(Theme::SKY)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn rule() -> Style {
        Style::default().fg(Theme::DIM)
    }
}
