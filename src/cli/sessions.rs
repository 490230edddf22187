// src/cli/sessions.rs — One-shot session commands: list, new, history, rename, delete, switch

use anyhow::bail;

use crate::backend::{Role, SessionId};
use crate::client::SessionContext;
use crate::render::sanitize;

/// Turn a failure the context swallowed into a command error.
fn check(ctx: &SessionContext) -> anyhow::Result<()> {
    match ctx.last_error() {
        Some(err) => bail!("{}", err),
        None => Ok(()),
    }
}

pub async fn list(ctx: &mut SessionContext) -> anyhow::Result<()> {
    ctx.refresh().await;
    check(ctx)?;

    let entries = ctx.sidebar().entries();
    if entries.is_empty() {
        println!("No sessions yet. Start one with `tutorchat new`.");
        return Ok(());
    }
    for entry in entries {
        let marker = if entry.active { "*" } else { " " };
        println!("{} {}  ({})", marker, sanitize(&entry.name), entry.id);
        if let Some(preview) = entry.preview.as_deref().filter(|p| !p.trim().is_empty()) {
            let first = preview.lines().next().unwrap_or_default();
            println!("    {}", sanitize(first));
        }
    }
    Ok(())
}

pub async fn new(ctx: &mut SessionContext) -> anyhow::Result<()> {
    match ctx.create_session().await {
        Some(id) => {
            println!("Created {} (now active)", id);
            Ok(())
        }
        None => {
            check(ctx)?;
            bail!("could not create a session")
        }
    }
}

pub async fn history(ctx: &mut SessionContext, id: &str) -> anyhow::Result<()> {
    ctx.load_history(&SessionId::new(id)).await;
    check(ctx)?;

    if ctx.pane().is_empty() {
        println!("(no messages)");
    }
    for message in ctx.pane().messages() {
        let label = match message.role {
            Role::User => "You",
            Role::Assistant => "Tutor",
        };
        println!("{}:", label);
        println!("{}", sanitize(&message.content));
        println!();
    }
    Ok(())
}

pub async fn rename(ctx: &mut SessionContext, id: &str, name: &str) -> anyhow::Result<()> {
    let id = SessionId::new(id);
    ctx.refresh().await;
    check(ctx)?;

    if !ctx.rename_session(&id, name).await {
        bail!("no session with id '{}'", id);
    }
    check(ctx)?;

    let shown = ctx
        .sidebar()
        .find(&id)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| name.trim().to_string());
    println!("{} is now \"{}\"", id, sanitize(&shown));
    Ok(())
}

pub async fn delete(ctx: &mut SessionContext, id: &str) -> anyhow::Result<()> {
    let id = SessionId::new(id);
    let was_active = ctx.active() == Some(&id);
    ctx.delete_session(&id).await;
    check(ctx)?;

    println!("Deleted {}", id);
    if was_active {
        match ctx.active() {
            Some(new) => println!("Active session is now {}", new),
            None => println!("No active session"),
        }
    }
    Ok(())
}

pub async fn switch(ctx: &mut SessionContext, id: &str) -> anyhow::Result<()> {
    let id = SessionId::new(id);
    if ctx.active() == Some(&id) {
        println!("{} is already active", id);
        return Ok(());
    }
    ctx.switch_session(&id).await;
    check(ctx)?;
    println!("Active session: {} ({} messages)", id, ctx.pane().len());
    Ok(())
}
