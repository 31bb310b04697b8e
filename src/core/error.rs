use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::types::EntityKind;

/// Failure surfaced by the API collaborator.
///
/// The cause is opaque to the store: it is recorded on the owning collection
/// and handed back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestFailure {
    /// Human-readable cause, usually the server `message` or the transport error.
    pub message: String,
    /// HTTP status when the transport had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Structured cause as returned by the server, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl RequestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            detail: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {})", self.message, status),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for RequestFailure {}

/// A document resource that could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    pub locator: String,
    pub reason: String,
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot render '{}': {}", self.locator, self.reason)
    }
}

impl std::error::Error for RenderFailure {}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Request failed: {0}")]
    Request(#[from] RequestFailure),

    #[error("Invalid patch for {kind}: {message}")]
    InvalidPatch { kind: EntityKind, message: String },

    #[error("Render failure: {0}")]
    Render(#[from] RenderFailure),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<SyncError> for RequestFailure {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Request(failure) => failure,
            other => RequestFailure::new(other.to_string()),
        }
    }
}
