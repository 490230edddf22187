// src/client/pane.rs — The message pane: ordered messages, one optional open reply

use ratatui::text::Text;

use crate::backend::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageState {
    /// Still receiving streamed content.
    Open,
    /// Final; never mutated again.
    Sealed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaneMessage {
    pub role: Role,
    pub content: String,
    pub rendered: Text<'static>,
    pub state: MessageState,
    /// How many times `rendered` has been produced for this message.
    pub render_count: u32,
}

/// Invariant: at most one message is open, and it is the last one.
#[derive(Debug, Default)]
pub struct MessagePane {
    messages: Vec<PaneMessage>,
    typing: bool,
    scroll_from_bottom: u16,
}

impl MessagePane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[PaneMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.typing = false;
        self.scroll_from_bottom = 0;
    }

    pub fn push_sealed(&mut self, role: Role, content: String, rendered: Text<'static>) {
        self.seal_open();
        self.messages.push(PaneMessage {
            role,
            content,
            rendered,
            state: MessageState::Sealed,
            render_count: 1,
        });
        self.pin_to_bottom();
    }

    /// Append an empty open assistant message. Returns false if one is already open.
    pub fn open_assistant(&mut self, rendered: Text<'static>) -> bool {
        if self.is_streaming() {
            return false;
        }
        self.messages.push(PaneMessage {
            role: Role::Assistant,
            content: String::new(),
            rendered,
            state: MessageState::Open,
            render_count: 1,
        });
        true
    }

    pub fn open_message(&self) -> Option<&PaneMessage> {
        self.messages
            .last()
            .filter(|m| m.state == MessageState::Open)
    }

    pub fn is_streaming(&self) -> bool {
        self.open_message().is_some()
    }

    /// Replace the open message's content and rendering. No-op when nothing is open.
    pub fn update_open(&mut self, content: &str, rendered: Text<'static>) -> bool {
        match self.messages.last_mut() {
            Some(m) if m.state == MessageState::Open => {
                m.content.clear();
                m.content.push_str(content);
                m.rendered = rendered;
                m.render_count += 1;
                true
            }
            _ => false,
        }
    }

    /// Seal the open message, if any, leaving its content as-is.
    pub fn seal_open(&mut self) {
        if let Some(m) = self.messages.last_mut() {
            m.state = MessageState::Sealed;
        }
    }

    pub fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    // ── Scrolling ────────────────────────────────────────────────

    pub fn scroll_from_bottom(&self) -> u16 {
        self.scroll_from_bottom
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn pin_to_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }
}
