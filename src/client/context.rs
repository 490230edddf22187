// src/client/context.rs — SessionContext: the single owner of client state
//
// Every mutation of the active session, the pane, and the sidebar goes through
// a method here. Backend failures are logged, remembered for the status line,
// and otherwise leave the prior state in place.

use std::sync::Arc;
use tokio::sync::mpsc;

use super::dispatch::SessionAction;
use super::pane::{MessagePane, PaneMessage};
use super::sidebar::{RenameCommit, Sidebar};
use super::store::SessionStore;
use super::stream::{spawn_chat, StreamConsumer, StreamEvent};
use crate::backend::{ChatBackend, ChatRequest, Role, SessionId};
use crate::infra::config::UiConfig;
use crate::infra::errors::ClientError;
use crate::render::Renderer;

/// What applying one stream event did to the open reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStep {
    /// Still open; more events follow.
    Continue,
    /// Reply sealed. `sync` is set when the session list should be refreshed.
    Finished { sync: bool },
}

struct ActiveStream {
    events: mpsc::Receiver<StreamEvent>,
    consumer: StreamConsumer,
}

pub struct SessionContext {
    backend: Arc<dyn ChatBackend>,
    store: SessionStore,
    renderer: Renderer,
    pane: MessagePane,
    sidebar: Sidebar,
    title: String,
    placeholder: String,
    pin_scroll: bool,
    last_error: Option<String>,
    stream: Option<ActiveStream>,
}

impl SessionContext {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        store: SessionStore,
        renderer: Renderer,
        ui: &UiConfig,
    ) -> Self {
        Self {
            backend,
            store,
            renderer,
            pane: MessagePane::new(),
            sidebar: Sidebar::new(ui.placeholder_title.clone()),
            title: ui.placeholder_title.clone(),
            placeholder: ui.placeholder_title.clone(),
            pin_scroll: ui.pin_scroll_while_streaming,
            last_error: None,
            stream: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn active(&self) -> Option<&SessionId> {
        self.store.get_active()
    }

    pub fn pane(&self) -> &MessagePane {
        &self.pane
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    fn fail(&mut self, what: &str, err: ClientError) {
        tracing::warn!("{} failed: {}", what, err);
        let hint = if err.is_transport() {
            " (is the server reachable?)"
        } else {
            ""
        };
        self.last_error = Some(format!("{what} failed: {err}{hint}"));
    }

    // ── Session lifecycle ────────────────────────────────────────

    /// Populate the sidebar, then show the remembered session or start a new one.
    pub async fn startup(&mut self) {
        self.refresh().await;
        match self.active().cloned() {
            Some(id) => {
                self.title = self.sidebar.highlight(Some(&id));
                self.load_history(&id).await;
            }
            None => {
                self.create_session().await;
            }
        }
    }

    /// Rebuild the sidebar from the backend. On failure the sidebar stays as it was.
    pub async fn refresh(&mut self) -> bool {
        match self.backend.list_sessions().await {
            Ok(sessions) => {
                let active = self.store.get_active().cloned();
                self.sidebar.rebuild(sessions, active.as_ref());
                self.title = self.sidebar.highlight(active.as_ref());
                true
            }
            Err(e) => {
                self.fail("Loading sessions", e);
                false
            }
        }
    }

    /// Replace the pane with the session's stored history.
    pub async fn load_history(&mut self, id: &SessionId) {
        self.pane.clear();
        match self.backend.history(id).await {
            Ok(messages) => {
                for message in messages {
                    let rendered = self.renderer.render(message.role, &message.content);
                    self.pane.push_sealed(message.role, message.content, rendered);
                }
                tracing::debug!(session = %id, messages = self.pane.len(), "History loaded");
            }
            Err(e) => self.fail("Loading history", e),
        }
    }

    /// Register a fresh session with the backend and make it active.
    pub async fn create_session(&mut self) -> Option<SessionId> {
        let id = SessionId::generate_distinct_from(self.active());
        if let Err(e) = self.backend.create_session(&id).await {
            self.fail("Creating session", e);
            return None;
        }

        self.stop_streaming();
        self.store.set_active(id.clone());
        self.pane.clear();
        self.title = self.placeholder.clone();
        self.refresh().await;
        tracing::debug!(session = %id, "Session created");
        Some(id)
    }

    pub async fn switch_session(&mut self, id: &SessionId) {
        if id.is_empty() || self.active() == Some(id) {
            return;
        }
        self.stop_streaming();
        self.store.set_active(id.clone());
        self.pane.clear();
        self.title = self.sidebar.highlight(Some(id));
        self.load_history(id).await;
    }

    pub async fn delete_session(&mut self, id: &SessionId) {
        if let Err(e) = self.backend.delete_session(id).await {
            self.fail("Deleting session", e);
            return;
        }
        tracing::debug!(session = %id, "Session deleted");

        if self.active() == Some(id) {
            if self.create_session().await.is_none() {
                // The deleted id must not stay active.
                self.stop_streaming();
                self.store.clear();
                self.pane.clear();
                self.title = self.placeholder.clone();
                self.refresh().await;
            }
        } else {
            self.refresh().await;
        }
    }

    // ── Sidebar interaction ──────────────────────────────────────

    pub fn begin_rename(&mut self, id: &SessionId) -> bool {
        self.sidebar.begin_rename(id)
    }

    pub fn cancel_rename(&mut self) {
        self.sidebar.cancel_rename();
    }

    /// Commit the open rename field. Only a changed, non-empty name reaches the backend.
    pub async fn commit_rename(&mut self) {
        let Some(RenameCommit::Save {
            id,
            old_name,
            new_name,
        }) = self.sidebar.commit_rename()
        else {
            return;
        };

        match self.backend.rename_session(&id, &new_name).await {
            Ok(()) => {
                tracing::debug!(session = %id, from = %old_name, to = %new_name, "Session renamed");
                self.sidebar.rename_succeeded(&id, &new_name);
                self.refresh().await;
            }
            Err(e) => {
                self.sidebar.rename_failed(&id);
                self.fail("Renaming session", e);
            }
        }
    }

    /// Rename without the inline field; same rules as committing one.
    /// Returns false when the session is not in the current list.
    pub async fn rename_session(&mut self, id: &SessionId, new_name: &str) -> bool {
        if !self.sidebar.begin_rename(id) {
            return false;
        }
        self.sidebar.set_draft(new_name);
        self.commit_rename().await;
        true
    }

    // ── Chat ─────────────────────────────────────────────────────

    /// Start a chat turn. Returns false (and does nothing) for blank text,
    /// no active session, or while a reply is still streaming.
    pub fn begin_send(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || self.stream.is_some() {
            return false;
        }
        let Some(session_id) = self.active().cloned() else {
            tracing::debug!("Send ignored: no active session");
            return false;
        };

        self.pane
            .push_sealed(Role::User, text.to_string(), self.renderer.render(Role::User, text));
        self.pane.open_assistant(self.renderer.render_markdown(""));
        self.pane.set_typing(true);
        self.last_error = None;

        let request = ChatRequest {
            text: text.to_string(),
            session_id,
        };
        self.stream = Some(ActiveStream {
            events: spawn_chat(Arc::clone(&self.backend), request),
            consumer: StreamConsumer::new(),
        });
        true
    }

    /// Wait for the next event of the running reply. `None` when nothing is streaming.
    pub async fn next_stream_event(&mut self) -> Option<StreamEvent> {
        let stream = self.stream.as_mut()?;
        Some(
            stream
                .events
                .recv()
                .await
                .unwrap_or_else(|| StreamEvent::Failed("reply stream closed unexpectedly".into())),
        )
    }

    /// Non-blocking variant for the UI loop.
    pub fn try_next_stream_event(&mut self) -> Option<StreamEvent> {
        let stream = self.stream.as_mut()?;
        match stream.events.try_recv() {
            Ok(event) => Some(event),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                Some(StreamEvent::Failed("reply stream closed unexpectedly".into()))
            }
        }
    }

    /// Apply one event to the open reply, re-rendering it from the full buffer.
    pub fn apply_stream_event(&mut self, event: StreamEvent) -> StreamStep {
        let Some(stream) = self.stream.as_mut() else {
            return StreamStep::Finished { sync: false };
        };

        match event {
            StreamEvent::Chunk(bytes) => {
                let content = stream.consumer.push(&bytes).to_string();
                let rendered = self.renderer.render_markdown(&content);
                self.pane.update_open(&content, rendered);
                if self.pin_scroll {
                    self.pane.pin_to_bottom();
                }
                StreamStep::Continue
            }
            StreamEvent::Full(body) => {
                self.stream = None;
                self.seal_reply(&body);
                StreamStep::Finished { sync: true }
            }
            StreamEvent::End => {
                let content = stream.consumer.finish().to_string();
                self.stream = None;
                self.seal_reply(&content);
                StreamStep::Finished { sync: true }
            }
            StreamEvent::Failed(message) => {
                self.stream = None;
                self.pane.set_typing(false);
                self.pane.seal_open();
                tracing::warn!("Chat failed: {}", message);
                self.last_error = Some(format!("Chat failed: {message}"));
                StreamStep::Finished { sync: false }
            }
        }
    }

    fn seal_reply(&mut self, content: &str) {
        self.pane.set_typing(false);
        let rendered = self.renderer.render_markdown(content);
        self.pane.update_open(content, rendered);
        self.pane.seal_open();
        if self.pin_scroll {
            self.pane.pin_to_bottom();
        }
    }

    /// Post-reply bookkeeping once a step reports `Finished`.
    pub async fn finish_stream(&mut self, step: StreamStep) {
        if step == (StreamStep::Finished { sync: true }) {
            self.refresh().await;
        }
    }

    /// Send and drive the reply to completion. `on_progress` sees the reply text after every event.
    pub async fn send_with<F>(&mut self, text: &str, mut on_progress: F) -> bool
    where
        F: FnMut(&PaneMessage),
    {
        if !self.begin_send(text) {
            return false;
        }
        while let Some(event) = self.next_stream_event().await {
            let step = self.apply_stream_event(event);
            if let Some(reply) = self.pane.messages().last() {
                on_progress(reply);
            }
            if step != StreamStep::Continue {
                self.finish_stream(step).await;
                break;
            }
        }
        true
    }

    pub async fn send(&mut self, text: &str) -> bool {
        self.send_with(text, |_| {}).await
    }

    /// Drop the running reply, keeping what arrived so far as the final message.
    pub fn stop_streaming(&mut self) -> bool {
        let Some(mut stream) = self.stream.take() else {
            return false;
        };
        let content = stream.consumer.finish().to_string();
        drop(stream.events);
        self.seal_reply(&content);
        tracing::debug!(chars = content.len(), "Reply stopped");
        true
    }

    // ── Actions ──────────────────────────────────────────────────

    pub async fn perform(&mut self, action: SessionAction) {
        match action {
            SessionAction::Send(text) => {
                self.begin_send(&text);
            }
            SessionAction::StopStreaming => {
                self.stop_streaming();
            }
            SessionAction::NewSession => {
                self.create_session().await;
            }
            SessionAction::Switch(id) => self.switch_session(&id).await,
            SessionAction::Delete(id) => self.delete_session(&id).await,
            SessionAction::OpenMenu(id) => self.sidebar.open_menu(&id),
            SessionAction::CloseMenus => self.sidebar.close_all_menus(),
            SessionAction::BeginRename(id) => {
                self.begin_rename(&id);
            }
            SessionAction::RenameInput(c) => self.sidebar.push_char(c),
            SessionAction::RenameBackspace => self.sidebar.backspace(),
            SessionAction::CommitRename => self.commit_rename().await,
            SessionAction::CancelRename => self.cancel_rename(),
            SessionAction::MoveCursor(delta) => self.sidebar.move_cursor(delta),
            SessionAction::Scroll(delta) => {
                if delta < 0 {
                    self.pane.scroll_up(delta.unsigned_abs());
                } else {
                    self.pane.scroll_down(delta as u16);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ChatReply, Message, MockChatBackend, SessionSummary};
    use bytes::Bytes;
    use futures::StreamExt;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn ui() -> UiConfig {
        UiConfig {
            highlight_code: false,
            ..UiConfig::default()
        }
    }

    fn ctx(mock: MockChatBackend, active: Option<&str>) -> SessionContext {
        SessionContext::new(
            Arc::new(mock),
            SessionStore::in_memory(active.map(SessionId::new)),
            Renderer::plain(),
            &ui(),
        )
    }

    fn summary(id: &str, name: Option<&str>) -> SessionSummary {
        SessionSummary {
            id: SessionId::new(id),
            name: name.map(String::from),
            preview: None,
        }
    }

    fn streamed(chunks: Vec<&'static str>) -> ChatReply {
        let items = chunks
            .into_iter()
            .map(|c| Ok::<_, ClientError>(Bytes::from_static(c.as_bytes())));
        ChatReply::Streamed(Box::pin(futures::stream::iter(items)))
    }

    fn contents(ctx: &SessionContext) -> Vec<(Role, String)> {
        ctx.pane()
            .messages()
            .iter()
            .map(|m| (m.role, m.content.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_send_appends_user_then_assistant() {
        let mut mock = MockChatBackend::new();
        mock.expect_chat()
            .returning(|_| Ok(ChatReply::Full("4".into())));
        mock.expect_list_sessions()
            .returning(|| Ok(vec![summary("s1", Some("Math"))]));

        let mut c = ctx(mock, Some("s1"));
        assert!(c.send("  2+2?  ").await);

        assert_eq!(
            contents(&c),
            vec![(Role::User, "2+2?".into()), (Role::Assistant, "4".into())]
        );
        assert!(!c.pane().is_streaming());
        assert!(!c.pane().is_typing());
        assert_eq!(c.title(), "Math");
    }

    #[tokio::test]
    async fn test_blank_send_or_no_session_is_noop() {
        let mut mock = MockChatBackend::new();
        mock.expect_chat().never();

        let mut c = ctx(mock, Some("s1"));
        assert!(!c.send("   ").await);
        assert!(c.pane().is_empty());

        let mut mock = MockChatBackend::new();
        mock.expect_chat().never();
        let mut c = ctx(mock, None);
        assert!(!c.send("hello").await);
        assert!(c.pane().is_empty());
    }

    #[tokio::test]
    async fn test_streamed_reply_renders_each_prefix() {
        let mut mock = MockChatBackend::new();
        mock.expect_chat()
            .with(eq(ChatRequest {
                text: "2+2?".into(),
                session_id: SessionId::new("s1"),
            }))
            .returning(|_| Ok(streamed(vec!["The ", "answer ", "is 4."])));
        mock.expect_list_sessions().times(1).returning(|| Ok(vec![]));

        let mut c = ctx(mock, Some("s1"));
        let mut seen = Vec::new();
        c.send_with("2+2?", |reply| seen.push(reply.content.clone()))
            .await;

        assert_eq!(
            seen,
            vec!["The ", "The answer ", "The answer is 4.", "The answer is 4."]
        );
        let reply = c.pane().messages().last().unwrap();
        assert_eq!(reply.content, "The answer is 4.");
        assert_eq!(reply.rendered, Renderer::plain().render_markdown("The answer is 4."));
        // placeholder, three chunks, final seal
        assert_eq!(reply.render_count, 5);
    }

    #[tokio::test]
    async fn test_chunk_split_inside_codepoint() {
        let mut mock = MockChatBackend::new();
        mock.expect_chat().returning(|_| {
            let bytes: &'static [u8] = "café".as_bytes();
            let items = vec![
                Ok::<_, ClientError>(Bytes::from_static(&bytes[..4])),
                Ok(Bytes::from_static(&bytes[4..])),
            ];
            Ok(ChatReply::Streamed(Box::pin(futures::stream::iter(items))))
        });
        mock.expect_list_sessions().returning(|| Ok(vec![]));

        let mut c = ctx(mock, Some("s1"));
        c.send("x").await;
        assert_eq!(c.pane().messages()[1].content, "café");
    }

    #[tokio::test]
    async fn test_failed_stream_keeps_partial_and_skips_sync() {
        let mut mock = MockChatBackend::new();
        mock.expect_chat().returning(|_| {
            let items = vec![
                Ok(Bytes::from_static(b"The ")),
                Err(ClientError::Stream("reset".into())),
            ];
            Ok(ChatReply::Streamed(Box::pin(futures::stream::iter(items))))
        });
        mock.expect_list_sessions().never();

        let mut c = ctx(mock, Some("s1"));
        c.send("q").await;

        assert_eq!(c.pane().messages()[1].content, "The ");
        assert!(!c.pane().is_streaming());
        assert!(!c.pane().is_typing());
        assert!(c.last_error().unwrap().contains("reset"));
    }

    #[tokio::test]
    async fn test_second_send_while_streaming_is_ignored() {
        let mut mock = MockChatBackend::new();
        mock.expect_chat().times(1).returning(|_| {
            let never = futures::stream::pending::<Result<Bytes, ClientError>>();
            Ok(ChatReply::Streamed(Box::pin(never)))
        });

        let mut c = ctx(mock, Some("s1"));
        assert!(c.begin_send("first"));
        assert!(!c.begin_send("second"));
        assert_eq!(c.pane().len(), 2);

        assert!(c.stop_streaming());
        assert!(!c.is_streaming());
        assert!(!c.pane().is_streaming());
    }

    #[tokio::test]
    async fn test_stop_keeps_partial_reply() {
        let mut mock = MockChatBackend::new();
        mock.expect_chat().returning(|_| {
            let head = futures::stream::iter(vec![Ok::<_, ClientError>(Bytes::from_static(b"Partial"))]);
            Ok(ChatReply::Streamed(Box::pin(head.chain(futures::stream::pending()))))
        });

        let mut c = ctx(mock, Some("s1"));
        c.begin_send("q");
        let event = c.next_stream_event().await.unwrap();
        assert_eq!(c.apply_stream_event(event), StreamStep::Continue);
        c.stop_streaming();

        let reply = c.pane().messages().last().unwrap();
        assert_eq!(reply.content, "Partial");
        assert!(!c.pane().is_typing());
    }

    #[tokio::test]
    async fn test_history_replayed_in_order() {
        let mut mock = MockChatBackend::new();
        mock.expect_history()
            .with(eq(SessionId::new("s1")))
            .returning(|_| Ok(vec![Message::user("hi"), Message::assistant("hello")]));

        let mut c = ctx(mock, Some("s1"));
        c.load_history(&SessionId::new("s1")).await;
        assert_eq!(
            contents(&c),
            vec![(Role::User, "hi".into()), (Role::Assistant, "hello".into())]
        );
        assert!(!c.pane().is_streaming());
    }

    #[tokio::test]
    async fn test_history_failure_leaves_pane_empty() {
        let mut mock = MockChatBackend::new();
        mock.expect_history().returning(|_| Err(ClientError::Unauthorized));

        let mut c = ctx(mock, Some("s1"));
        c.load_history(&SessionId::new("s1")).await;
        assert!(c.pane().is_empty());
        assert!(c.last_error().is_some());
    }

    #[tokio::test]
    async fn test_refresh_twice_is_stable() {
        let mut mock = MockChatBackend::new();
        mock.expect_list_sessions()
            .times(2)
            .returning(|| Ok(vec![summary("s1", Some("Math")), summary("s2", None)]));

        let mut c = ctx(mock, Some("s2"));
        c.refresh().await;
        let first = c.sidebar().entries().to_vec();
        c.refresh().await;
        assert_eq!(c.sidebar().entries(), first.as_slice());
        assert_eq!(c.title(), "New Chat");
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_stale_list() {
        let mut mock = MockChatBackend::new();
        let mut calls = 0;
        mock.expect_list_sessions().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(vec![summary("s1", Some("Math"))])
            } else {
                Err(ClientError::Stream("down".into()))
            }
        });

        let mut c = ctx(mock, Some("s1"));
        assert!(c.refresh().await);
        assert!(!c.refresh().await);
        assert_eq!(c.sidebar().entries().len(), 1);
        assert_eq!(c.sidebar().entries()[0].name, "Math");
    }

    #[tokio::test]
    async fn test_startup_without_active_creates_session() {
        let mut mock = MockChatBackend::new();
        mock.expect_list_sessions().returning(|| Ok(vec![]));
        mock.expect_create_session().times(1).returning(|_| Ok(()));
        mock.expect_history().never();

        let mut c = ctx(mock, None);
        c.startup().await;
        assert!(c.active().unwrap().as_str().starts_with("session-"));
        assert_eq!(c.title(), "New Chat");
    }

    #[tokio::test]
    async fn test_startup_with_active_loads_history() {
        let mut mock = MockChatBackend::new();
        mock.expect_list_sessions()
            .returning(|| Ok(vec![summary("s1", Some("Math"))]));
        mock.expect_history()
            .returning(|_| Ok(vec![Message::user("hi")]));
        mock.expect_create_session().never();

        let mut c = ctx(mock, Some("s1"));
        c.startup().await;
        assert_eq!(c.title(), "Math");
        assert_eq!(c.pane().len(), 1);
    }

    #[tokio::test]
    async fn test_switch_to_same_session_is_noop() {
        let mut mock = MockChatBackend::new();
        mock.expect_history().never();

        let mut c = ctx(mock, Some("s1"));
        c.switch_session(&SessionId::new("s1")).await;
        c.switch_session(&SessionId::new("")).await;
    }

    #[tokio::test]
    async fn test_switch_loads_other_session() {
        let mut mock = MockChatBackend::new();
        mock.expect_history()
            .with(eq(SessionId::new("s2")))
            .returning(|_| Ok(vec![Message::assistant("welcome back")]));

        let mut c = ctx(mock, Some("s1"));
        c.switch_session(&SessionId::new("s2")).await;
        assert_eq!(c.active(), Some(&SessionId::new("s2")));
        assert_eq!(contents(&c), vec![(Role::Assistant, "welcome back".into())]);
    }

    #[tokio::test]
    async fn test_delete_active_creates_distinct_session() {
        let mut mock = MockChatBackend::new();
        mock.expect_delete_session().times(1).returning(|_| Ok(()));
        mock.expect_create_session().times(1).returning(|_| Ok(()));
        mock.expect_list_sessions().returning(|| Ok(vec![]));
        mock.expect_history()
            .returning(|_| Ok(vec![Message::user("old")]));

        let old = SessionId::generate();
        let mut c = ctx(mock, Some(old.as_str()));
        c.load_history(&old).await;
        assert_eq!(c.pane().len(), 1);

        c.delete_session(&old).await;
        let new = c.active().unwrap();
        assert_ne!(new, &old);
        assert!(c.pane().is_empty());
        assert_eq!(c.title(), "New Chat");
    }

    #[tokio::test]
    async fn test_delete_inactive_only_resyncs() {
        let mut mock = MockChatBackend::new();
        mock.expect_delete_session()
            .with(eq(SessionId::new("s2")))
            .returning(|_| Ok(()));
        mock.expect_create_session().never();
        mock.expect_list_sessions()
            .times(1)
            .returning(|| Ok(vec![summary("s1", None)]));

        let mut c = ctx(mock, Some("s1"));
        c.delete_session(&SessionId::new("s2")).await;
        assert_eq!(c.active(), Some(&SessionId::new("s1")));
        assert_eq!(c.sidebar().entries().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_entry() {
        let mut mock = MockChatBackend::new();
        mock.expect_list_sessions()
            .times(1)
            .returning(|| Ok(vec![summary("s1", None), summary("s2", None)]));
        mock.expect_delete_session()
            .returning(|_| Err(ClientError::Stream("down".into())));

        let mut c = ctx(mock, Some("s1"));
        c.refresh().await;
        c.delete_session(&SessionId::new("s2")).await;
        assert_eq!(c.sidebar().entries().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_active_with_failed_create_clears_active() {
        let mut mock = MockChatBackend::new();
        mock.expect_delete_session().returning(|_| Ok(()));
        mock.expect_create_session()
            .returning(|_| Err(ClientError::Stream("down".into())));
        mock.expect_list_sessions().returning(|| Ok(vec![]));

        let mut c = ctx(mock, Some("s1"));
        c.delete_session(&SessionId::new("s1")).await;
        assert_eq!(c.active(), None);
        assert_eq!(c.title(), "New Chat");
    }

    #[tokio::test]
    async fn test_unchanged_rename_makes_no_call() {
        let mut mock = MockChatBackend::new();
        mock.expect_list_sessions()
            .times(1)
            .returning(|| Ok(vec![summary("s1", Some("Math"))]));
        mock.expect_rename_session().never();

        let mut c = ctx(mock, Some("s1"));
        c.refresh().await;
        let id = SessionId::new("s1");
        c.begin_rename(&id);
        c.commit_rename().await;

        c.begin_rename(&id);
        for _ in 0..4 {
            c.perform(SessionAction::RenameBackspace).await;
        }
        c.commit_rename().await;
        assert_eq!(c.sidebar().entries()[0].name, "Math");
    }

    #[tokio::test]
    async fn test_rename_success_resyncs() {
        let mut mock = MockChatBackend::new();
        let mut calls = 0;
        mock.expect_list_sessions().times(2).returning(move || {
            calls += 1;
            let name = if calls == 1 { "Math" } else { "Algebra" };
            Ok(vec![summary("s1", Some(name))])
        });
        mock.expect_rename_session()
            .withf(|id, name| id.as_str() == "s1" && name == "Algebra")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut c = ctx(mock, Some("s1"));
        c.refresh().await;
        c.begin_rename(&SessionId::new("s1"));
        for _ in 0..4 {
            c.perform(SessionAction::RenameBackspace).await;
        }
        for ch in " Algebra ".chars() {
            c.perform(SessionAction::RenameInput(ch)).await;
        }
        c.perform(SessionAction::CommitRename).await;

        assert_eq!(c.sidebar().entries()[0].name, "Algebra");
        assert_eq!(c.title(), "Algebra");
    }

    #[tokio::test]
    async fn test_rename_failure_reverts() {
        let mut mock = MockChatBackend::new();
        mock.expect_list_sessions()
            .times(1)
            .returning(|| Ok(vec![summary("s1", Some("Math"))]));
        mock.expect_rename_session()
            .returning(|_, _| Err(ClientError::Stream("down".into())));

        let mut c = ctx(mock, Some("s1"));
        c.refresh().await;
        c.begin_rename(&SessionId::new("s1"));
        c.perform(SessionAction::RenameInput('!')).await;
        c.commit_rename().await;

        let entry = &c.sidebar().entries()[0];
        assert_eq!(entry.name, "Math");
        assert_eq!(entry.mode, crate::client::sidebar::EntryMode::Display);
        assert!(c.last_error().is_some());
    }

    fn idle_reply_mock() -> MockChatBackend {
        let mut mock = MockChatBackend::new();
        mock.expect_chat().returning(|_| {
            let never = futures::stream::pending::<Result<Bytes, ClientError>>();
            Ok(ChatReply::Streamed(Box::pin(never)))
        });
        mock.expect_list_sessions().returning(|| Ok(vec![]));
        mock
    }

    #[tokio::test]
    async fn test_chunk_pins_scroll_to_bottom() {
        let mut c = ctx(idle_reply_mock(), Some("s1"));
        assert!(c.begin_send("explain"));

        c.perform(SessionAction::Scroll(-5)).await;
        assert_eq!(c.pane().scroll_from_bottom(), 5);

        let step = c.apply_stream_event(StreamEvent::Chunk(Bytes::from_static(b"Step one")));
        assert_eq!(step, StreamStep::Continue);
        assert_eq!(c.pane().scroll_from_bottom(), 0);
    }

    #[tokio::test]
    async fn test_unpinned_scroll_survives_chunks_and_seal() {
        let config = UiConfig {
            pin_scroll_while_streaming: false,
            ..ui()
        };
        let mut c = SessionContext::new(
            Arc::new(idle_reply_mock()),
            SessionStore::in_memory(Some(SessionId::new("s1"))),
            Renderer::plain(),
            &config,
        );
        assert!(c.begin_send("explain"));

        c.perform(SessionAction::Scroll(-5)).await;
        c.apply_stream_event(StreamEvent::Chunk(Bytes::from_static(b"Step one")));
        assert_eq!(c.pane().scroll_from_bottom(), 5);

        let step = c.apply_stream_event(StreamEvent::End);
        assert_eq!(step, StreamStep::Finished { sync: true });
        c.finish_stream(step).await;
        assert_eq!(c.pane().scroll_from_bottom(), 5);
        assert_eq!(c.pane().messages()[1].content, "Step one");
    }

    #[tokio::test]
    async fn test_transport_failure_hints_at_server() {
        let mut mock = MockChatBackend::new();
        mock.expect_list_sessions()
            .returning(|| Err(ClientError::Stream("connection reset".into())));
        mock.expect_delete_session()
            .returning(|_| Err(ClientError::Unauthorized));

        let mut c = ctx(mock, Some("s1"));
        assert!(!c.refresh().await);
        assert!(c.last_error().unwrap().ends_with("(is the server reachable?)"));

        c.delete_session(&SessionId::new("s1")).await;
        assert!(!c.last_error().unwrap().contains("reachable"));
    }
}
