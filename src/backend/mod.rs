// src/backend/mod.rs — Chat backend layer

pub mod http;
pub mod types;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::pin::Pin;

use crate::infra::errors::ClientError;

/// Byte chunks of a streamed reply, in arrival order.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ClientError>> + Send>>;

/// Everything the client needs from the remote chat API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn create_session(&self, id: &SessionId) -> Result<(), ClientError>;

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, ClientError>;

    async fn history(&self, id: &SessionId) -> Result<Vec<Message>, ClientError>;

    async fn rename_session(&self, id: &SessionId, new_name: &str) -> Result<(), ClientError>;

    async fn delete_session(&self, id: &SessionId) -> Result<(), ClientError>;

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, ClientError>;
}

/// Opaque session identifier. Client-generated ids look like `session-<unix millis>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self::from_millis(chrono::Utc::now().timestamp_millis())
    }

    /// Generate an id guaranteed to differ from `previous`.
    pub fn generate_distinct_from(previous: Option<&SessionId>) -> Self {
        let mut millis = chrono::Utc::now().timestamp_millis();
        loop {
            let candidate = Self::from_millis(millis);
            if Some(&candidate) != previous {
                return candidate;
            }
            millis += 1;
        }
    }

    fn from_millis(millis: i64) -> Self {
        Self(format!("session-{millis}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the session list as the backend reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub id: SessionId,
    pub name: Option<String>,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    User,
    Assistant,
}

/// Anything the backend does not call "assistant" is shown as the user's.
impl From<String> for Role {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("assistant") {
            Role::Assistant
        } else {
            Role::User
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub text: String,
    pub session_id: SessionId,
}

/// How the backend answered a chat request.
pub enum ChatReply {
    /// Incrementally readable body.
    Streamed(ByteStream),
    /// Complete body delivered at once.
    Full(String),
}

impl fmt::Debug for ChatReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatReply::Streamed(_) => f.write_str("ChatReply::Streamed(..)"),
            ChatReply::Full(body) => f.debug_tuple("ChatReply::Full").field(body).finish(),
        }
    }
}
