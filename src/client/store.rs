// src/client/store.rs — Active session id, persisted across restarts
//
// The only client-side state that survives a restart. The id is never
// validated locally; a stale id surfaces when the history fetch fails.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::backend::SessionId;
use crate::infra::errors::ClientError;
use crate::infra::paths;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ActiveSessionFile {
    active_session_id: Option<SessionId>,
}

#[derive(Debug)]
pub struct SessionStore {
    active: Option<SessionId>,
    /// `None` keeps the store in memory only.
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Open the store at the default state path.
    pub fn open() -> Self {
        Self::open_at(paths::active_session_path())
    }

    /// Open a file-backed store. An unreadable file starts empty.
    pub fn open_at(path: PathBuf) -> Self {
        let active = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<ActiveSessionFile>(&content) {
                Ok(file) => file.active_session_id.filter(|id| !id.is_empty()),
                Err(e) => {
                    tracing::warn!("Ignoring corrupt {}: {}", path.display(), e);
                    None
                }
            },
            Err(_) => None,
        };
        Self {
            active,
            path: Some(path),
        }
    }

    pub fn in_memory(active: Option<SessionId>) -> Self {
        Self { active, path: None }
    }

    pub fn get_active(&self) -> Option<&SessionId> {
        self.active.as_ref()
    }

    /// Set and persist. A failed write is logged; the in-memory value still changes.
    pub fn set_active(&mut self, id: SessionId) {
        self.active = Some(id);
        if let Err(e) = self.persist() {
            tracing::warn!("Failed to persist active session: {}", e);
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
        if let Err(e) = self.persist() {
            tracing::warn!("Failed to clear active session: {}", e);
        }
    }

    /// Atomic write: temp file then rename.
    fn persist(&self) -> Result<(), ClientError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = ActiveSessionFile {
            active_session_id: self.active.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(anyhow::Error::from)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("active-session.json");

        let mut store = SessionStore::open_at(path.clone());
        assert_eq!(store.get_active(), None);
        store.set_active(SessionId::new("session-42"));

        let reopened = SessionStore::open_at(path);
        assert_eq!(reopened.get_active(), Some(&SessionId::new("session-42")));
    }

    #[test]
    fn test_clear_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("active-session.json");

        let mut store = SessionStore::open_at(path.clone());
        store.set_active(SessionId::new("s1"));
        store.clear();

        assert_eq!(SessionStore::open_at(path).get_active(), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("active-session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(SessionStore::open_at(path).get_active(), None);
    }

    #[test]
    fn test_in_memory_store() {
        let mut store = SessionStore::in_memory(None);
        store.set_active(SessionId::new("s2"));
        assert_eq!(store.get_active().map(|s| s.as_str()), Some("s2"));
    }
}
