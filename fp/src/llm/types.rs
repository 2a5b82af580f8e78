//! LLM request types for fitplan
//!
//! Every request is a single-turn conversation: one user message holding the rendered prompt.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Rendered prompt, sent as the only user message
    pub prompt: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature, in [0, 2]
    pub temperature: f64,

    /// Max tokens for the response
    pub max_tokens: u32,

    /// Nucleus-sampling threshold, in (0, 1]
    pub top_p: f64,
}

impl CompletionRequest {
    /// Check the request before it is sent
    pub fn validate(&self) -> Result<(), String> {
        debug!(%self.model, %self.max_tokens, "CompletionRequest::validate: called");
        if self.prompt.trim().is_empty() {
            return Err("prompt must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} is outside [0, 2]", self.temperature));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be positive".to_string());
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(format!("top_p {} is outside (0, 1]", self.top_p));
        }
        Ok(())
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
