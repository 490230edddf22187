// src/main.rs — tutorchat entry point

use clap::Parser;
use std::path::Path;
use std::sync::Arc;

use tutorchat::auth::AuthStore;
use tutorchat::backend::http::HttpBackend;
use tutorchat::cli::{self, Cli, Commands};
use tutorchat::client::{SessionContext, SessionStore};
use tutorchat::infra::config::Config;
use tutorchat::infra::{logger, paths};
use tutorchat::render::Renderer;
use tutorchat::tui;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The full-screen UI owns the terminal, so its logs go to a file.
    if cli.command.is_none() {
        logger::init_file_logging(&cli.log_level, &paths::log_file_path());
    } else {
        logger::init_logging(&cli.log_level);
    }

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load config (falls back to defaults if no config.toml)
    let config = match &cli.config {
        Some(path) => Config::load_from(Path::new(path))?,
        None => Config::load()?,
    }
    .with_base_url(cli.api_base.as_deref())?;

    let Some(command) = cli.command else {
        return tui::run_chat(session_context(&config)?).await;
    };

    match command {
        Commands::Sessions => cli::sessions::list(&mut session_context(&config)?).await,
        Commands::New => cli::sessions::new(&mut session_context(&config)?).await,
        Commands::History { id } => {
            cli::sessions::history(&mut session_context(&config)?, &id).await
        }
        Commands::Ask { text, session } => {
            let mut ctx = session_context(&config)?;
            cli::ask::run_ask(&mut ctx, &text.join(" "), session.as_deref()).await
        }
        Commands::Rename { id, name } => {
            cli::sessions::rename(&mut session_context(&config)?, &id, &name.join(" ")).await
        }
        Commands::Delete { id } => cli::sessions::delete(&mut session_context(&config)?, &id).await,
        Commands::Switch { id } => cli::sessions::switch(&mut session_context(&config)?, &id).await,
        Commands::Login { email } => cli::auth::run_login(&config, email.as_deref()).await,
        Commands::Signup => cli::auth::run_signup(&config).await,
        Commands::Logout => cli::auth::run_logout(),
    }
}

fn session_context(config: &Config) -> anyhow::Result<SessionContext> {
    let auth = AuthStore::load()?;
    if !auth.is_logged_in() {
        tracing::debug!("No stored token; calling the backend anonymously");
    }
    let backend = HttpBackend::new(&config.server, auth.token().map(String::from))?;
    Ok(SessionContext::new(
        Arc::new(backend),
        SessionStore::open(),
        Renderer::new(&config.ui),
        &config.ui,
    ))
}
