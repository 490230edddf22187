// src/infra/logger.rs — Structured logging with tracing

use std::path::Path;

use tracing_subscriber::{fmt, EnvFilter};

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Compact stderr logging for one-shot commands.
pub fn init_logging(level: &str) {
    fmt()
        .with_env_filter(filter(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// File logging for the full-screen UI, which owns the terminal.
///
/// Falls back to discarding logs when the file cannot be opened.
pub fn init_file_logging(level: &str, path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path);

    match file {
        Ok(file) => {
            fmt()
                .with_env_filter(filter(level))
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        Err(_) => {
            fmt()
                .with_env_filter(filter(level))
                .with_writer(std::io::sink)
                .init();
        }
    }
}
