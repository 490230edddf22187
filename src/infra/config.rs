// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::ClientError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
    /// Applies to connection setup only. Chat bodies may stream indefinitely.
    pub connect_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Title shown when the active session has no name in the list.
    pub placeholder_title: String,
    pub highlight_code: bool,
    /// Any theme name bundled with syntect's default theme set.
    pub syntax_theme: String,
    /// Snap the message pane to the bottom on every streamed re-render,
    /// even when the user has scrolled up.
    pub pin_scroll_while_streaming: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            placeholder_title: "New Chat".into(),
            highlight_code: true,
            syntax_theme: "base16-ocean.dark".into(),
            pin_scroll_while_streaming: true,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> Result<Self, ClientError> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ClientError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Override the backend base URL (e.g. from `--api-base`).
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Result<Self, ClientError> {
        if let Some(url) = base_url {
            self.server.base_url = url.to_string();
            self.validate()?;
        }
        Ok(self)
    }

    fn validate(&self) -> Result<(), ClientError> {
        url::Url::parse(&self.server.base_url).map_err(|e| {
            ClientError::Config(format!(
                "server.base_url '{}' is not a valid URL: {}",
                self.server.base_url, e
            ))
        })?;
        Ok(())
    }
}
