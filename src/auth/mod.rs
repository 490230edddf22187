// src/auth/mod.rs — Persisted access token for the chat backend
//
// The backend issues a JWT from /auth/login or /auth/signup. It is stored in
// ~/.tutorchat/auth.json and attached as a bearer token to every call.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::errors::ClientError;
use crate::infra::paths;

/// Contents of auth.json.
///
/// # Security Note
/// The token is stored as plaintext JSON on disk (chmod 600 on Unix), the same
/// way most CLI tools keep their credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthStore {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
}

impl AuthStore {
    /// Load auth.json. Returns an empty store if the file doesn't exist.
    pub fn load() -> Result<Self, ClientError> {
        Self::load_from(&paths::auth_file_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ClientError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self) -> Result<(), ClientError> {
        self.save_to(&paths::auth_file_path())
    }

    /// Save atomically (write to .tmp then rename, chmod 600).
    pub fn save_to(&self, path: &Path) -> Result<(), ClientError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(anyhow::Error::from)?;

        let tmp_path: PathBuf = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
        }

        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }
}
