// src/cli/auth.rs — login / signup / logout

use anyhow::{bail, Context};

use crate::auth::AuthStore;
use crate::backend::http::HttpBackend;
use crate::backend::types::AuthResponse;
use crate::infra::config::Config;
use crate::infra::paths;

fn prompt_password(label: &str, confirm: bool) -> anyhow::Result<String> {
    let prompt = inquire::Password::new(label)
        .with_display_mode(inquire::PasswordDisplayMode::Masked);
    let prompt = if confirm {
        prompt.with_custom_confirmation_message("Confirm password:")
    } else {
        prompt.without_confirmation()
    };
    let password = prompt.prompt().context("password prompt cancelled")?;
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(password)
}

fn prompt_text(label: &str) -> anyhow::Result<String> {
    let value = inquire::Text::new(label)
        .prompt()
        .with_context(|| format!("{} prompt cancelled", label.trim_end_matches(':')))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        bail!("{} must not be empty", label.trim_end_matches(':').to_lowercase());
    }
    Ok(value)
}

fn store_token(response: AuthResponse) -> anyhow::Result<()> {
    let auth = AuthStore {
        access_token: Some(response.access_token),
        user: response.user,
    };
    auth.save()?;

    match &auth.user {
        Some(user) => println!("Logged in as {} <{}>", user.name, user.email),
        None => println!("Logged in"),
    }
    println!("  Token saved to {}", paths::auth_file_path().display());
    Ok(())
}

pub async fn run_login(config: &Config, email: Option<&str>) -> anyhow::Result<()> {
    let email = match email {
        Some(e) => e.trim().to_string(),
        None => prompt_text("Email:")?,
    };
    let password = prompt_password("Password:", false)?;

    let backend = HttpBackend::new(&config.server, None)?;
    let response = backend.login(&email, &password).await?;
    store_token(response)
}

pub async fn run_signup(config: &Config) -> anyhow::Result<()> {
    let name = prompt_text("Name:")?;
    let email = prompt_text("Email:")?;
    let password = prompt_password("Password:", true)?;

    let backend = HttpBackend::new(&config.server, None)?;
    let response = backend.signup(&name, &email, &password).await?;
    store_token(response)
}

pub fn run_logout() -> anyhow::Result<()> {
    let path = paths::auth_file_path();
    if !path.exists() {
        println!("Not logged in.");
        return Ok(());
    }
    std::fs::remove_file(&path)
        .with_context(|| format!("removing {}", path.display()))?;
    println!("Logged out.");
    Ok(())
}
