// src/cli/ask.rs — `tutorchat ask`: send one message, stream the reply to stdout

use anyhow::{bail, Context};
use std::io::Write;

use crate::backend::SessionId;
use crate::client::{SessionContext, StreamStep};
use crate::infra::errors::ClientError;
use crate::render::StreamSanitizer;

pub async fn run_ask(
    ctx: &mut SessionContext,
    text: &str,
    session: Option<&str>,
) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        bail!("nothing to send");
    }

    match session {
        Some(id) => ctx.switch_session(&SessionId::new(id)).await,
        None if ctx.active().is_none() => {
            ctx.create_session().await;
        }
        None => {}
    }
    if ctx.active().is_none() {
        if let Some(err) = ctx.last_error() {
            bail!("{}", err);
        }
        return Err(ClientError::NoActiveSession.into());
    }

    if !ctx.begin_send(text) {
        bail!("could not send message");
    }
    let mut printer = ReplyPrinter::new(std::io::stdout());
    while let Some(event) = ctx.next_stream_event().await {
        let step = ctx.apply_stream_event(event);
        if let Some(reply) = ctx.pane().messages().last() {
            if let Err(e) = printer.update(&reply.content) {
                ctx.stop_streaming();
                return Err(e).context("writing reply to stdout");
            }
        }
        if step != StreamStep::Continue {
            ctx.finish_stream(step).await;
            break;
        }
    }
    printer.finish().context("writing reply to stdout")?;

    if let Some(err) = ctx.last_error() {
        bail!("{}", err);
    }
    Ok(())
}

/// Writes a growing reply as sanitized deltas.
struct ReplyPrinter<W: Write> {
    out: W,
    seen: usize,
    sanitizer: StreamSanitizer,
}

impl<W: Write> ReplyPrinter<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            seen: 0,
            sanitizer: StreamSanitizer::new(),
        }
    }

    /// `content` only grows, so everything past `seen` is new.
    fn update(&mut self, content: &str) -> std::io::Result<()> {
        let Some(delta) = content.get(self.seen..) else {
            return Ok(());
        };
        self.seen = content.len();
        let clean = self.sanitizer.push(delta);
        if !clean.is_empty() {
            self.out.write_all(clean.as_bytes())?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> std::io::Result<()> {
        let rest = self.sanitizer.finish();
        writeln!(self.out, "{rest}")?;
        self.out.flush()
    }
}
