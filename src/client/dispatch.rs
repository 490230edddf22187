// src/client/dispatch.rs — Pure mapping from UI events to actions
//
// `dispatch` reads a snapshot of the view and never mutates anything, so every
// key binding can be tested without a terminal or a backend.

use crate::backend::SessionId;

/// Terminal-independent key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Tab,
    Backspace,
    Up,
    Down,
    PageUp,
    PageDown,
    CtrlC,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Key(Key),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Sidebar,
    #[default]
    Composer,
}

/// What `dispatch` needs to know about the current screen.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub focus: Focus,
    pub composer: String,
    pub streaming: bool,
    /// False when no session is active; sends are refused and the draft kept.
    pub has_active: bool,
    pub editing: bool,
    pub menu_open: Option<SessionId>,
    pub selected: Option<SessionId>,
}

/// Mutations of the session context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Send(String),
    StopStreaming,
    NewSession,
    Switch(SessionId),
    Delete(SessionId),
    OpenMenu(SessionId),
    CloseMenus,
    BeginRename(SessionId),
    RenameInput(char),
    RenameBackspace,
    CommitRename,
    CancelRename,
    /// Move the sidebar cursor (positive = down).
    MoveCursor(isize),
    /// Scroll the message pane (positive = towards the bottom).
    Scroll(i16),
}

/// Mutations that only touch the terminal front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    ToggleFocus,
    ComposerInput(char),
    ComposerBackspace,
    ComposerClear,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Session(SessionAction),
    Ui(UiAction),
}

const PAGE: i16 = 10;

pub fn dispatch(event: UiEvent, view: &ViewState) -> Vec<Action> {
    let UiEvent::Key(key) = event;
    use Action::{Session as S, Ui as U};

    if key == Key::CtrlC {
        return vec![U(UiAction::Quit)];
    }

    // The rename field owns the keyboard while open. Leaving it commits.
    if view.editing {
        return match key {
            Key::Enter => vec![S(SessionAction::CommitRename)],
            Key::Esc => vec![S(SessionAction::CancelRename)],
            Key::Backspace => vec![S(SessionAction::RenameBackspace)],
            Key::Char(c) => vec![S(SessionAction::RenameInput(c))],
            Key::Tab => vec![S(SessionAction::CommitRename), U(UiAction::ToggleFocus)],
            _ => vec![],
        };
    }

    match key {
        Key::Tab => {
            return vec![S(SessionAction::CloseMenus), U(UiAction::ToggleFocus)];
        }
        Key::Esc if view.menu_open.is_some() => return vec![S(SessionAction::CloseMenus)],
        Key::Esc if view.streaming => return vec![S(SessionAction::StopStreaming)],
        Key::Esc => return vec![],
        Key::PageUp => return vec![S(SessionAction::Scroll(-PAGE))],
        Key::PageDown => return vec![S(SessionAction::Scroll(PAGE))],
        _ => {}
    }

    match view.focus {
        Focus::Sidebar => dispatch_sidebar(key, view),
        Focus::Composer => dispatch_composer(key, view),
    }
}

fn dispatch_sidebar(key: Key, view: &ViewState) -> Vec<Action> {
    use Action::Session as S;

    if let Some(id) = &view.menu_open {
        return match key {
            Key::Char('r') => vec![S(SessionAction::BeginRename(id.clone()))],
            Key::Char('d') => vec![
                S(SessionAction::CloseMenus),
                S(SessionAction::Delete(id.clone())),
            ],
            // Anything else is a click outside.
            _ => vec![S(SessionAction::CloseMenus)],
        };
    }

    match key {
        Key::Up => vec![S(SessionAction::MoveCursor(-1))],
        Key::Down => vec![S(SessionAction::MoveCursor(1))],
        Key::Char('n') => vec![S(SessionAction::NewSession)],
        Key::Enter => view
            .selected
            .clone()
            .map(|id| vec![S(SessionAction::Switch(id))])
            .unwrap_or_default(),
        Key::Char('m') => view
            .selected
            .clone()
            .map(|id| vec![S(SessionAction::OpenMenu(id))])
            .unwrap_or_default(),
        _ => vec![],
    }
}

fn dispatch_composer(key: Key, view: &ViewState) -> Vec<Action> {
    use Action::{Session as S, Ui as U};

    match key {
        Key::Enter => {
            let text = view.composer.trim();
            if text.is_empty() || view.streaming || !view.has_active {
                vec![]
            } else {
                vec![
                    S(SessionAction::Send(text.to_string())),
                    U(UiAction::ComposerClear),
                ]
            }
        }
        Key::Char(c) => vec![U(UiAction::ComposerInput(c))],
        Key::Backspace => vec![U(UiAction::ComposerBackspace)],
        Key::Up => vec![S(SessionAction::Scroll(-1))],
        Key::Down => vec![S(SessionAction::Scroll(1))],
        _ => vec![],
    }
}
