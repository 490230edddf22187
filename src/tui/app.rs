// src/tui/app.rs — Chat screen: state, event loop, and top-level rendering.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};

use super::theme::Theme;
use super::widgets;
use crate::client::{
    dispatch, Action, Focus, Key, SessionContext, StreamStep, UiAction, UiEvent, ViewState,
};

const IDLE_POLL: Duration = Duration::from_millis(250);
const STREAMING_POLL: Duration = Duration::from_millis(30);

struct App {
    ctx: SessionContext,
    focus: Focus,
    composer: String,
    quit: bool,
}

impl App {
    fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
            focus: Focus::Composer,
            composer: String::new(),
            quit: false,
        }
    }

    fn view_state(&self) -> ViewState {
        let sidebar = self.ctx.sidebar();
        ViewState {
            focus: self.focus,
            composer: self.composer.clone(),
            streaming: self.ctx.is_streaming(),
            has_active: self.ctx.active().is_some(),
            editing: sidebar.is_editing(),
            menu_open: sidebar.open_menu_id().cloned(),
            selected: sidebar.selected().map(|e| e.id.clone()),
        }
    }

    async fn apply(&mut self, action: Action) {
        match action {
            Action::Session(a) => self.ctx.perform(a).await,
            Action::Ui(UiAction::ToggleFocus) => {
                self.focus = match self.focus {
                    Focus::Sidebar => Focus::Composer,
                    Focus::Composer => Focus::Sidebar,
                };
            }
            Action::Ui(UiAction::ComposerInput(c)) => self.composer.push(c),
            Action::Ui(UiAction::ComposerBackspace) => {
                self.composer.pop();
            }
            Action::Ui(UiAction::ComposerClear) => self.composer.clear(),
            Action::Ui(UiAction::Quit) => self.quit = true,
        }
    }

    /// Apply whatever reply events have arrived without waiting.
    async fn pump_stream(&mut self) {
        while let Some(event) = self.ctx.try_next_stream_event() {
            let step = self.ctx.apply_stream_event(event);
            if step != StreamStep::Continue {
                self.ctx.finish_stream(step).await;
                break;
            }
        }
    }
}

// ── Public entry point ───────────────────────────────────────────

/// Launch the chat screen. Returns when the user quits (Ctrl-C).
pub async fn run_chat(ctx: SessionContext) -> anyhow::Result<()> {
    let mut app = App::new(ctx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.draw(|f| render(f, &app))?;
    app.ctx.startup().await;
    let result = run_event_loop(&mut terminal, &mut app).await;

    // Restore terminal
    app.ctx.stop_streaming();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        app.pump_stream().await;
        terminal.draw(|f| render(f, app))?;

        let timeout = if app.ctx.is_streaming() {
            STREAMING_POLL
        } else {
            IDLE_POLL
        };
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(key) = map_key(key) {
                    for action in dispatch(UiEvent::Key(key), &app.view_state()) {
                        app.apply(action).await;
                    }
                }
            }
        }

        if app.quit {
            return Ok(());
        }
    }
}

fn map_key(key: KeyEvent) -> Option<Key> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Key::CtrlC),
            _ => None,
        };
    }
    Some(match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        _ => return None,
    })
}

// ── Rendering ────────────────────────────────────────────────────

fn render(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Sidebar + conversation
            Constraint::Length(1), // Footer / key hints
        ])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(widgets::sidebar::SIDEBAR_WIDTH),
            Constraint::Min(20),
        ])
        .split(rows[0]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(columns[1]);

    widgets::sidebar::render(f, columns[0], app.ctx.sidebar(), app.focus == Focus::Sidebar);
    widgets::messages::render(f, main[0], app.ctx.pane(), app.ctx.title());
    widgets::composer::render(
        f,
        main[1],
        &app.composer,
        app.focus == Focus::Composer,
        app.ctx.is_streaming(),
    );
    render_footer(f, rows[1], app);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.ctx.last_error() {
        Some(err) => Line::from(Span::styled(format!(" {}", err), Theme::error())),
        None => Line::from(vec![
            Span::styled(" ^C", Theme::key_hint()),
            Span::styled(" quit  ", Theme::key_desc()),
            Span::styled("Tab", Theme::key_hint()),
            Span::styled(" focus  ", Theme::key_desc()),
            Span::styled("n", Theme::key_hint()),
            Span::styled(" new  ", Theme::key_desc()),
            Span::styled("m", Theme::key_hint()),
            Span::styled(" menu  ", Theme::key_desc()),
            Span::styled("PgUp/PgDn", Theme::key_hint()),
            Span::styled(" scroll  ", Theme::key_desc()),
            Span::styled("Esc", Theme::key_hint()),
            Span::styled(" stop/cancel", Theme::key_desc()),
        ]),
    };
    f.render_widget(Paragraph::new(line), area);
}
