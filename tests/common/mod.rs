// tests/common/mod.rs — In-process fake of the tutor chat API (axum)

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use bytes::Bytes;
use serde_json::{json, Value};

use tutorchat::infra::config::ServerConfig;

#[derive(Clone)]
pub enum ChatMode {
    /// text/plain body sent as separate chunks.
    Streamed(Vec<&'static str>),
    /// application/json `{response}` body.
    Json(String),
    /// Bare status code.
    Status(u16),
}

pub struct FakeData {
    /// (id, name, preview), newest first.
    pub sessions: Vec<(String, Option<String>, Option<String>)>,
    pub histories: HashMap<String, Vec<(String, String)>>,
    pub chat_mode: ChatMode,
    pub require_token: Option<String>,
    pub seen_auth: Vec<Option<String>>,
    pub chat_requests: Vec<Value>,
}

impl Default for FakeData {
    fn default() -> Self {
        Self {
            sessions: Vec::new(),
            histories: HashMap::new(),
            chat_mode: ChatMode::Streamed(vec!["The ", "answer ", "is 4."]),
            require_token: None,
            seen_auth: Vec::new(),
            chat_requests: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct Fake(pub Arc<Mutex<FakeData>>);

impl Fake {
    pub fn with(f: impl FnOnce(&mut FakeData)) -> Self {
        let fake = Fake::default();
        f(&mut fake.0.lock().unwrap());
        fake
    }

    pub fn data(&self) -> std::sync::MutexGuard<'_, FakeData> {
        self.0.lock().unwrap()
    }

    /// Serve on an ephemeral port; returns the base URL.
    pub async fn serve(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

pub fn server_config(base_url: &str) -> ServerConfig {
    ServerConfig {
        base_url: base_url.to_string(),
        ..ServerConfig::default()
    }
}

fn router(fake: Fake) -> Router {
    Router::new()
        .route("/session/new", post(new_session))
        .route("/sessions", get(list_sessions))
        .route("/history/{id}", get(history))
        .route("/session/{id}/rename", put(rename))
        .route("/session/{id}", delete(remove))
        .route("/chat", post(chat))
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .with_state(fake)
}

/// Record the Authorization header; reject when a token is required and missing.
fn authorize(fake: &Fake, headers: &HeaderMap) -> Result<(), Response> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let mut data = fake.data();
    data.seen_auth.push(auth.clone());
    match &data.require_token {
        Some(token) if auth.as_deref() != Some(format!("Bearer {token}").as_str()) => {
            Err((StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid token"}))).into_response())
        }
        _ => Ok(()),
    }
}

async fn new_session(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = authorize(&fake, &headers) {
        return r;
    }
    let id = body["session_id"].as_str().unwrap_or_default().to_string();
    let mut data = fake.data();
    data.sessions.insert(0, (id.clone(), None, None));
    data.histories.entry(id.clone()).or_default();
    Json(json!({"status": "success", "session_id": id})).into_response()
}

async fn list_sessions(State(fake): State<Fake>, headers: HeaderMap) -> Response {
    if let Err(r) = authorize(&fake, &headers) {
        return r;
    }
    let data = fake.data();
    let sessions: Vec<Value> = data
        .sessions
        .iter()
        .map(|(id, name, preview)| json!({"session_id": id, "session_name": name, "preview": preview}))
        .collect();
    Json(json!({ "sessions": sessions })).into_response()
}

async fn history(State(fake): State<Fake>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(r) = authorize(&fake, &headers) {
        return r;
    }
    let data = fake.data();
    match data.histories.get(&id) {
        Some(messages) => {
            let messages: Vec<Value> = messages
                .iter()
                .map(|(role, content)| json!({"role": role, "content": content, "timestamp": "2026-10-16T09:00:00"}))
                .collect();
            Json(json!({ "messages": messages })).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Session not found"}))).into_response(),
    }
}

async fn rename(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = authorize(&fake, &headers) {
        return r;
    }
    let new_name = body["new_name"].as_str().unwrap_or_default().to_string();
    let mut data = fake.data();
    match data.sessions.iter_mut().find(|(sid, _, _)| *sid == id) {
        Some(entry) => {
            entry.1 = Some(new_name);
            Json(json!({"status": "success"})).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Session not found"}))).into_response(),
    }
}

async fn remove(State(fake): State<Fake>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(r) = authorize(&fake, &headers) {
        return r;
    }
    let mut data = fake.data();
    data.sessions.retain(|(sid, _, _)| *sid != id);
    data.histories.remove(&id);
    Json(json!({"status": "success"})).into_response()
}

async fn chat(State(fake): State<Fake>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(r) = authorize(&fake, &headers) {
        return r;
    }
    let mode = {
        let mut data = fake.data();
        data.chat_requests.push(body.clone());

        let id = body["session_id"].as_str().unwrap_or_default().to_string();
        let text = body["text"].as_str().unwrap_or_default().to_string();
        let reply = match &data.chat_mode {
            ChatMode::Streamed(chunks) => {
                chunks.concat()
            }
            ChatMode::Json(r) => r.clone(),
            ChatMode::Status(_) => String::new(),
        };
        if let Some(entry) = data.sessions.iter_mut().find(|(sid, _, _)| *sid == id) {
            entry.2 = Some(text.clone());
        }
        let history = data.histories.entry(id).or_default();
        history.push(("user".into(), text));
        history.push(("assistant".into(), reply));
        data.chat_mode.clone()
    };

    match mode {
        ChatMode::Streamed(chunks) => {
            let stream = async_stream::stream! {
                for chunk in chunks {
                    tokio::time::sleep(Duration::from_millis(15)).await;
                    yield Ok::<_, std::convert::Infallible>(Bytes::from_static(chunk.as_bytes()));
                }
            };
            Response::builder()
                .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(Body::from_stream(stream))
                .unwrap()
        }
        ChatMode::Json(reply) => Json(json!({ "response": reply })).into_response(),
        ChatMode::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
    }
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" {
        Json(json!({
            "access_token": "tok-123",
            "token_type": "bearer",
            "user": {"name": "Ada", "email": body["email"]}
        }))
        .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid email or password"}))).into_response()
    }
}

async fn signup(Json(body): Json<Value>) -> Response {
    Json(json!({
        "access_token": "tok-new",
        "token_type": "bearer",
        "user": {"name": body["name"], "email": body["email"]}
    }))
    .into_response()
}
