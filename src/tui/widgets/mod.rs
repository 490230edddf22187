// src/tui/widgets/mod.rs — Panels of the chat screen.

pub mod composer;
pub mod messages;
pub mod sidebar;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::render::sanitize;

/// Cut `s` to at most `max` terminal columns (first line only), marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    let first = s.lines().next().unwrap_or("");
    if first.width() <= max {
        return first.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in first.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// `truncate` for server-supplied text (names, previews, titles).
pub fn label(s: &str, max: usize) -> String {
    truncate(&sanitize(s).replace('\t', " "), max)
}

#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
