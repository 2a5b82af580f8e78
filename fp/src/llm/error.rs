//! LLM error types

use thiserror::Error;

/// Any failure contacting or receiving from the completion service
///
/// Network, authentication and server-side failures are not distinguished; the
/// caller only gets the message text.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CompletionError {
    message: String,
}

impl CompletionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Non-success HTTP status from the service
    pub fn api(status: u16, body: &str) -> Self {
        Self::new(format!("API error {}: {}", status, body.trim()))
    }

    /// Response body that could not be interpreted
    pub fn invalid_response(detail: impl AsRef<str>) -> Self {
        Self::new(format!("Invalid response: {}", detail.as_ref()))
    }

    /// Request rejected before it was sent
    pub fn invalid_request(detail: impl AsRef<str>) -> Self {
        Self::new(format!("Invalid request: {}", detail.as_ref()))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(format!("Network error: {}", e))
    }
}

impl From<serde_json::Error> for CompletionError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_response(e.to_string())
    }
}
