// src/backend/http.rs — reqwest implementation of the chat backend

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use url::Url;

use super::types::{
    AuthResponse, FullChatResponse, HistoryResponse, LoginBody, NewSessionBody, RenameBody,
    SessionListResponse, SignupBody,
};
use super::{ChatBackend, ChatReply, ChatRequest, Message, SessionId, SessionSummary};
use crate::infra::config::ServerConfig;
use crate::infra::errors::ClientError;

pub struct HttpBackend {
    base_url: Url,
    client: reqwest::Client,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &ServerConfig, token: Option<String>) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base URL '{}' cannot carry paths",
                config.base_url
            )));
        }

        // No overall timeout: a chat body may stream for as long as the model runs.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            client,
            token,
        })
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and map transport failures and non-success statuses to errors.
    async fn send(&self, builder: RequestBuilder, url: &Url) -> Result<Response, ClientError> {
        let endpoint = url.path().to_string();
        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::http(&endpoint, e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("{} -> {}", endpoint, status);
        Ok(response)
    }

    async fn json<T: serde::de::DeserializeOwned>(
        response: Response,
        url: &Url,
    ) -> Result<T, ClientError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::decode(url.path(), e))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let url = self.endpoint(&["auth", "login"]);
        let builder = self
            .request(Method::POST, url.clone())
            .json(&LoginBody { email, password });
        let response = self.send(builder, &url).await?;
        Self::json(response, &url).await
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let url = self.endpoint(&["auth", "signup"]);
        let builder = self.request(Method::POST, url.clone()).json(&SignupBody {
            name,
            email,
            password,
        });
        let response = self.send(builder, &url).await?;
        Self::json(response, &url).await
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("json"))
        .unwrap_or(false)
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn create_session(&self, id: &SessionId) -> Result<(), ClientError> {
        let url = self.endpoint(&["session", "new"]);
        let builder = self
            .request(Method::POST, url.clone())
            .json(&NewSessionBody { session_id: id });
        self.send(builder, &url).await?;
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, ClientError> {
        let url = self.endpoint(&["sessions"]);
        let response = self.send(self.request(Method::GET, url.clone()), &url).await?;
        let list: SessionListResponse = Self::json(response, &url).await?;
        Ok(list.sessions.into_iter().map(Into::into).collect())
    }

    async fn history(&self, id: &SessionId) -> Result<Vec<Message>, ClientError> {
        let url = self.endpoint(&["history", id.as_str()]);
        let response = self.send(self.request(Method::GET, url.clone()), &url).await?;
        let history: HistoryResponse = Self::json(response, &url).await?;
        Ok(history.messages)
    }

    async fn rename_session(&self, id: &SessionId, new_name: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["session", id.as_str(), "rename"]);
        let builder = self
            .request(Method::PUT, url.clone())
            .json(&RenameBody { new_name });
        self.send(builder, &url).await?;
        Ok(())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<(), ClientError> {
        let url = self.endpoint(&["session", id.as_str()]);
        self.send(self.request(Method::DELETE, url.clone()), &url)
            .await?;
        Ok(())
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, ClientError> {
        let url = self.endpoint(&["chat"]);
        let builder = self.request(Method::POST, url.clone()).json(&request);
        let response = self.send(builder, &url).await?;

        // A JSON body is a complete `{"response": ...}` reply; anything else streams.
        if is_json(&response) {
            let body = response
                .text()
                .await
                .map_err(|e| ClientError::http(url.path(), e))?;
            let text = match serde_json::from_str::<FullChatResponse>(&body) {
                Ok(FullChatResponse {
                    response: Some(text),
                }) => text,
                _ => body,
            };
            return Ok(ChatReply::Full(text));
        }

        let byte_stream = response.bytes_stream();
        let stream = async_stream::stream! {
            let mut byte_stream = std::pin::pin!(byte_stream);
            while let Some(chunk) = byte_stream.next().await {
                match chunk {
                    Ok(bytes) => yield Ok(bytes),
                    Err(e) => {
                        yield Err(ClientError::Stream(e.to_string()));
                        break;
                    }
                }
            }
        };

        Ok(ChatReply::Streamed(Box::pin(stream)))
    }
}
