//! # Sentry Errors
//!
//! Error type returned by every Sentry API call. It carries the HTTP status
//! when the server answered, which is what the reconciler classifies on.

use thiserror::Error;

/// Error returned by the Sentry API client
#[derive(Debug, Error)]
pub enum SentryError {
    /// The API answered with a non-2xx status
    #[error("sentry: {detail}")]
    Api { status: u16, detail: String },
    /// The request never produced a response (connect, TLS, timeout, ...)
    #[error("sentry: request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body could not be decoded
    #[error("sentry: failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The request URL could not be built; nothing was sent
    #[error("sentry: invalid request path {path}: {reason}")]
    InvalidPath { path: String, reason: String },
}

impl SentryError {
    /// Build an API error from a status code and message
    pub fn api(status: u16, detail: impl Into<String>) -> Self {
        Self::Api {
            status,
            detail: detail.into(),
        }
    }

    /// Build an API error from a raw error response body
    ///
    /// Sentry returns `{"detail": "..."}` for most errors and a field-keyed
    /// object for validation errors (e.g. `{"slug": ["..."]}`).
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let detail = match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(serde_json::Value::Object(map)) => match map.get("detail") {
                Some(serde_json::Value::String(detail)) => detail.clone(),
                _ => serde_json::Value::Object(map).to_string(),
            },
            Ok(other) => other.to_string(),
            Err(_) => {
                let text = String::from_utf8_lossy(body).trim().to_string();
                if text.is_empty() {
                    format!("unexpected status {status}")
                } else {
                    text
                }
            }
        };
        Self::Api { status, detail }
    }

    /// HTTP status of the failed call, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            SentryError::Api { status, .. } => Some(*status),
            SentryError::Transport(e) => e.status().map(|s| s.as_u16()),
            SentryError::Decode(_) | SentryError::InvalidPath { .. } => None,
        }
    }
}
