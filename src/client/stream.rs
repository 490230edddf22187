// src/client/stream.rs — Chat reply producer task and the consuming buffer
//
// The producer owns the HTTP response and forwards events over a bounded
// channel. Dropping the receiver is the stop signal: the producer notices on
// its next send, or while waiting for the next chunk.

use bytes::Bytes;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::decoder::Utf8StreamDecoder;
use crate::backend::{ChatBackend, ChatReply, ChatRequest};

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Raw body bytes, in arrival order.
    Chunk(Bytes),
    /// The whole reply, delivered at once.
    Full(String),
    /// Incremental body finished.
    End,
    /// Request or read failure; nothing follows.
    Failed(String),
}

/// Start a chat request on its own task and return the event receiver.
pub fn spawn_chat(backend: Arc<dyn ChatBackend>, request: ChatRequest) -> mpsc::Receiver<StreamEvent> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(produce(backend, request, tx));
    rx
}

async fn produce(backend: Arc<dyn ChatBackend>, request: ChatRequest, tx: mpsc::Sender<StreamEvent>) {
    let session = request.session_id.clone();
    let reply = tokio::select! {
        reply = backend.chat(request) => reply,
        _ = tx.closed() => {
            tracing::debug!(%session, "Chat cancelled before the reply started");
            return;
        }
    };

    let mut body = match reply {
        Ok(ChatReply::Full(text)) => {
            let _ = tx.send(StreamEvent::Full(text)).await;
            return;
        }
        Ok(ChatReply::Streamed(body)) => body,
        Err(e) => {
            let _ = tx.send(StreamEvent::Failed(e.to_string())).await;
            return;
        }
    };

    let mut chunks = 0usize;
    loop {
        let next = tokio::select! {
            next = body.next() => next,
            _ = tx.closed() => {
                tracing::debug!(%session, chunks, "Chat stream stopped by consumer");
                return;
            }
        };
        let event = match next {
            Some(Ok(bytes)) => {
                chunks += 1;
                StreamEvent::Chunk(bytes)
            }
            Some(Err(e)) => StreamEvent::Failed(e.to_string()),
            None => StreamEvent::End,
        };
        let terminal = !matches!(event, StreamEvent::Chunk(_));
        if tx.send(event).await.is_err() {
            tracing::debug!(%session, chunks, "Chat consumer gone");
            return;
        }
        if terminal {
            tracing::debug!(%session, chunks, "Chat stream finished");
            return;
        }
    }
}

/// Accumulates decoded text across chunks.
#[derive(Debug, Default)]
pub struct StreamConsumer {
    decoder: Utf8StreamDecoder,
    buffer: String,
}

impl StreamConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk and return the full text so far.
    pub fn push(&mut self, chunk: &[u8]) -> &str {
        let text = self.decoder.decode(chunk);
        self.buffer.push_str(&text);
        &self.buffer
    }

    /// Flush any incomplete trailing sequence and return the final text.
    pub fn finish(&mut self) -> &str {
        if self.decoder.has_pending() {
            tracing::debug!("Reply ended inside a UTF-8 sequence");
        }
        let tail = self.decoder.finish();
        self.buffer.push_str(&tail);
        &self.buffer
    }
}
