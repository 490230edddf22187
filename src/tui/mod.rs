// src/tui/mod.rs — Full-screen chat interface.
//
// Sidebar of sessions, streamed conversation pane and a composer, built with
// ratatui. Launched when tutorchat runs without a subcommand.

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::run_chat;
