//! Completion client module for fitplan
//!
//! Sends a rendered prompt to a hosted text-generation endpoint and returns the generated text.

use std::sync::Arc;

use tracing::debug;

mod chat_completions;
pub mod client;
mod error;
mod types;

pub use chat_completions::ChatCompletionsClient;
pub use client::CompletionClient;
pub use error::CompletionError;
pub use types::{CompletionRequest, Role};

use crate::config::LlmConfig;

/// Create a completion client from config and a credential resolved at startup
pub fn create_client(
    config: &LlmConfig,
    api_key: impl Into<String>,
) -> Result<Arc<dyn CompletionClient>, CompletionError> {
    debug!(model = %config.model, base_url = %config.base_url, "create_client: called");
    Ok(Arc::new(ChatCompletionsClient::from_config(config, api_key)?))
}
