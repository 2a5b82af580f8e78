//! CompletionClient trait definition

use async_trait::async_trait;

use super::{CompletionError, CompletionRequest};

/// Stateless completion client - each call is independent
///
/// Every request carries exactly one user message; no conversation is kept
/// between calls. The caller awaits the full response; there is no streaming
/// and no retry.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a single completion request and return the first completion's text
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
