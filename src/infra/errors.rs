// src/infra/errors.rs — Error types for tutorchat

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    // Transport errors
    #[error("Request to '{endpoint}' failed: {message}")]
    Http { endpoint: String, message: String },

    #[error("'{endpoint}' returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Not logged in or token expired. Run `tutorchat login`.")]
    Unauthorized,

    #[error("Invalid response from '{endpoint}': {message}")]
    Decode { endpoint: String, message: String },

    #[error("Stream read error: {0}")]
    Stream(String),

    // Client state
    #[error("No active session")]
    NoActiveSession,

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClientError {
    pub fn http(endpoint: impl Into<String>, err: reqwest::Error) -> Self {
        ClientError::Http {
            endpoint: endpoint.into(),
            message: err.to_string(),
        }
    }

    pub fn decode(endpoint: impl Into<String>, message: impl ToString) -> Self {
        ClientError::Decode {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Whether the failure happened before the backend answered at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http { .. } | ClientError::Stream(_))
    }
}
