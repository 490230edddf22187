// src/backend/types.rs — Request/response shapes of the chat API

use serde::{Deserialize, Serialize};

use super::{Message, SessionId, SessionSummary};
use crate::auth::UserInfo;

#[derive(Debug, Serialize)]
pub struct NewSessionBody<'a> {
    pub session_id: &'a SessionId,
}

#[derive(Debug, Serialize)]
pub struct RenameBody<'a> {
    pub new_name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SessionListResponse {
    #[serde(default)]
    pub sessions: Vec<SessionEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SessionEntry {
    pub session_id: SessionId,
    #[serde(default)]
    pub session_name: Option<String>,
    #[serde(default)]
    pub preview: Option<String>,
}

impl From<SessionEntry> for SessionSummary {
    fn from(e: SessionEntry) -> Self {
        SessionSummary {
            id: e.session_id,
            name: e.session_name.filter(|n| !n.trim().is_empty()),
            preview: e.preview,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Non-streaming chat reply: `{"response": "..."}`.
#[derive(Debug, Deserialize)]
pub struct FullChatResponse {
    #[serde(default)]
    pub response: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignupBody<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<UserInfo>,
}
