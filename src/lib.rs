// src/lib.rs — tutorchat: terminal client for the AI tutor chat API

pub mod auth;
pub mod backend;
pub mod cli;
pub mod client;
pub mod infra;
pub mod render;
pub mod tui;
