// src/client/sidebar.rs — Session list model: entries, highlight, menus, inline rename
//
// `rebuild` always discards every entry and builds the list again from the
// backend's answer; no per-entry diffing.

use crate::backend::{SessionId, SessionSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryMode {
    Display,
    /// Inline rename field is open with an editable draft.
    Editing { draft: String },
    /// Rename request in flight.
    Saving { draft: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub id: SessionId,
    /// Display name; the placeholder when the backend sent none.
    pub name: String,
    pub preview: Option<String>,
    pub active: bool,
    pub mode: EntryMode,
    pub menu_open: bool,
}

/// Outcome of committing an inline rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameCommit {
    /// Empty or unchanged after trimming; nothing to send.
    Cancelled,
    Save {
        id: SessionId,
        old_name: String,
        new_name: String,
    },
}

#[derive(Debug)]
pub struct Sidebar {
    entries: Vec<SidebarEntry>,
    cursor: usize,
    placeholder: String,
}

impl Sidebar {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            placeholder: placeholder.into(),
        }
    }

    pub fn entries(&self) -> &[SidebarEntry] {
        &self.entries
    }

    pub fn find(&self, id: &SessionId) -> Option<&SidebarEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    fn find_mut(&mut self, id: &SessionId) -> Option<&mut SidebarEntry> {
        self.entries.iter_mut().find(|e| &e.id == id)
    }

    /// Replace every entry with the backend's list, in the backend's order.
    pub fn rebuild(&mut self, sessions: Vec<SessionSummary>, active: Option<&SessionId>) {
        self.entries = sessions
            .into_iter()
            .map(|s| SidebarEntry {
                active: active == Some(&s.id),
                name: s.name.unwrap_or_else(|| self.placeholder.clone()),
                preview: s.preview,
                id: s.id,
                mode: EntryMode::Display,
                menu_open: false,
            })
            .collect();

        self.cursor = active
            .and_then(|id| self.entries.iter().position(|e| &e.id == id))
            .unwrap_or_else(|| self.cursor.min(self.entries.len().saturating_sub(1)));
    }

    /// Mark exactly the entry with `active` (if listed) and return the title to show.
    pub fn highlight(&mut self, active: Option<&SessionId>) -> String {
        for entry in &mut self.entries {
            entry.active = active == Some(&entry.id);
        }
        self.title_for(active)
    }

    pub fn title_for(&self, active: Option<&SessionId>) -> String {
        active
            .and_then(|id| self.find(id))
            .map(|e| e.name.clone())
            .unwrap_or_else(|| self.placeholder.clone())
    }

    // ── Cursor ───────────────────────────────────────────────────

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&SidebarEntry> {
        self.entries.get(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.entries.is_empty() {
            self.cursor = 0;
            return;
        }
        let max = self.entries.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, max) as usize;
    }

    // ── Menus ────────────────────────────────────────────────────

    /// Open one entry's menu, closing every other menu first.
    pub fn open_menu(&mut self, id: &SessionId) {
        self.close_all_menus();
        if let Some(entry) = self.find_mut(id) {
            entry.menu_open = true;
        }
    }

    pub fn close_all_menus(&mut self) {
        for entry in &mut self.entries {
            entry.menu_open = false;
        }
    }

    pub fn open_menu_id(&self) -> Option<&SessionId> {
        self.entries.iter().find(|e| e.menu_open).map(|e| &e.id)
    }

    // ── Inline rename ────────────────────────────────────────────

    /// Display -> Editing, draft pre-filled with the current name.
    pub fn begin_rename(&mut self, id: &SessionId) -> bool {
        self.cancel_rename();
        self.close_all_menus();
        match self.find_mut(id) {
            Some(entry) => {
                entry.mode = EntryMode::Editing {
                    draft: entry.name.clone(),
                };
                true
            }
            None => false,
        }
    }

    pub fn editing(&self) -> Option<(&SessionId, &str)> {
        self.entries.iter().find_map(|e| match &e.mode {
            EntryMode::Editing { draft } => Some((&e.id, draft.as_str())),
            _ => None,
        })
    }

    pub fn is_editing(&self) -> bool {
        self.editing().is_some()
    }

    fn draft_mut(&mut self) -> Option<&mut String> {
        self.entries.iter_mut().find_map(|e| match &mut e.mode {
            EntryMode::Editing { draft } => Some(draft),
            _ => None,
        })
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(draft) = self.draft_mut() {
            draft.push(c);
        }
    }

    pub fn set_draft(&mut self, text: &str) {
        if let Some(draft) = self.draft_mut() {
            draft.clear();
            draft.push_str(text);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(draft) = self.draft_mut() {
            draft.pop();
        }
    }

    /// Editing -> Saving for a changed non-empty draft; otherwise back to Display.
    pub fn commit_rename(&mut self) -> Option<RenameCommit> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| matches!(e.mode, EntryMode::Editing { .. }))?;

        let EntryMode::Editing { draft } = std::mem::replace(&mut entry.mode, EntryMode::Display)
        else {
            return None;
        };
        let new_name = draft.trim();
        if new_name.is_empty() || new_name == entry.name {
            return Some(RenameCommit::Cancelled);
        }

        entry.mode = EntryMode::Saving {
            draft: new_name.to_string(),
        };
        Some(RenameCommit::Save {
            id: entry.id.clone(),
            old_name: entry.name.clone(),
            new_name: new_name.to_string(),
        })
    }

    /// Editing -> Display with the name untouched.
    pub fn cancel_rename(&mut self) {
        for entry in &mut self.entries {
            if matches!(entry.mode, EntryMode::Editing { .. }) {
                entry.mode = EntryMode::Display;
            }
        }
    }

    /// Saving -> Display showing the new name, until the next rebuild.
    pub fn rename_succeeded(&mut self, id: &SessionId, new_name: &str) {
        if let Some(entry) = self.find_mut(id) {
            entry.name = new_name.to_string();
            entry.mode = EntryMode::Display;
        }
    }

    /// Saving -> Display showing the old name.
    pub fn rename_failed(&mut self, id: &SessionId) {
        if let Some(entry) = self.find_mut(id) {
            entry.mode = EntryMode::Display;
        }
    }
}
